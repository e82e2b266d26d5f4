//! Release reconciliation: creating the fix version and attaching it to valid issues

pub mod reconciler;

pub use reconciler::{
    ReleaseOutcome, ReleasePhase, ReleasePolicy, ReleaseReconciler, ReleaseSummary, TagOutcome,
};
