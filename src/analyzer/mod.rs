//! Analysis engine turning commit subjects into validated issues

pub mod classifier;
pub mod validator;

pub use classifier::{Classification, CommitClassifier};
pub use validator::{InvalidIssue, IssueValidator, ValidationPolicy, ValidationReport};
