use tracing::debug;

use crate::domain::{CommitGroup, PatternMatcher};

/// Commit subjects partitioned by whether they reference an issue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub groups: CommitGroup,
    /// Trimmed subjects that did not match the pattern, in input order
    pub unmatched: Vec<String>,
}

/// Groups commit subjects by the issue key the pattern extracts from them
pub struct CommitClassifier<'a> {
    matcher: &'a PatternMatcher,
}

impl<'a> CommitClassifier<'a> {
    pub fn new(matcher: &'a PatternMatcher) -> Self {
        CommitClassifier { matcher }
    }

    /// Classify every message in order. Each message ends up either in the
    /// group of its key or in the unmatched list, never both and never neither.
    pub fn classify<S: AsRef<str>>(&self, messages: &[S]) -> Classification {
        let mut classification = Classification::default();

        for message in messages {
            let message = message.as_ref();
            match self.matcher.extract(message) {
                Some((key, value)) => classification.groups.push(key, value),
                None => classification.unmatched.push(message.trim().to_string()),
            }
        }

        debug!(
            issues = classification.groups.len(),
            matched = classification.groups.commit_count(),
            unmatched = classification.unmatched.len(),
            "classified commits"
        );
        classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IssueKey, DEFAULT_COMMIT_PATTERN};

    #[test]
    fn test_classify_groups_and_unmatched() {
        let matcher =
            PatternMatcher::compile(r"^(?P<key>[A-Z]+-[0-9]+)[ :-](?P<value>.*)").unwrap();
        let classifier = CommitClassifier::new(&matcher);
        let result = classifier.classify(&["CORE-12: fix bug", "CORE-12 more fix", "no ticket here"]);

        assert_eq!(result.groups.len(), 1);
        assert_eq!(
            result.groups.get(&IssueKey::new("CORE-12")).unwrap(),
            &["fix bug".to_string(), "more fix".to_string()]
        );
        assert_eq!(result.unmatched, vec!["no ticket here".to_string()]);
    }

    #[test]
    fn test_uppercase_only_pattern_skips_lowercase_key() {
        let matcher =
            PatternMatcher::compile(r"^(?P<key>[A-Z]+-[0-9]+)[ :-](?P<value>.*)").unwrap();
        let classifier = CommitClassifier::new(&matcher);
        let result =
            classifier.classify(&["CORE-12: fix bug", "core-12 - more fix", "no ticket here"]);

        // The key class is case sensitive, so the lowercase subject never matches
        assert_eq!(
            result.groups.get(&IssueKey::new("CORE-12")).unwrap(),
            &["fix bug".to_string()]
        );
        assert_eq!(
            result.unmatched,
            vec!["core-12 - more fix".to_string(), "no ticket here".to_string()]
        );

        // The default pattern accepts it and keeps the separator in the fragment
        let matcher = PatternMatcher::compile(DEFAULT_COMMIT_PATTERN).unwrap();
        let result = CommitClassifier::new(&matcher).classify(&["core-12 - more fix"]);
        assert_eq!(
            result.groups.get(&IssueKey::new("CORE-12")).unwrap(),
            &["- more fix".to_string()]
        );
    }

    #[test]
    fn test_classify_is_case_insensitive_on_keys() {
        let matcher = PatternMatcher::compile(DEFAULT_COMMIT_PATTERN).unwrap();
        let classifier = CommitClassifier::new(&matcher);
        let result = classifier.classify(&["core-1: lower", "CORE-1: upper"]);

        let keys: Vec<&str> = result.groups.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["CORE-1"]);
        assert_eq!(result.groups.commit_count(), 2);
    }

    #[test]
    fn test_unmatched_is_trimmed() {
        let matcher = PatternMatcher::compile(DEFAULT_COMMIT_PATTERN).unwrap();
        let classifier = CommitClassifier::new(&matcher);
        let result = classifier.classify(&["  Merge branch main  "]);
        assert_eq!(result.unmatched, vec!["Merge branch main".to_string()]);
    }

    #[test]
    fn test_empty_input() {
        let matcher = PatternMatcher::compile(DEFAULT_COMMIT_PATTERN).unwrap();
        let classifier = CommitClassifier::new(&matcher);
        let result = classifier.classify::<String>(&[]);
        assert!(result.groups.is_empty());
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_every_message_lands_exactly_once() {
        let matcher = PatternMatcher::compile(DEFAULT_COMMIT_PATTERN).unwrap();
        let classifier = CommitClassifier::new(&matcher);
        let messages = vec![
            "CORE-1: a".to_string(),
            "nothing".to_string(),
            "OPS-2 b".to_string(),
            "core-1: c".to_string(),
            "also nothing".to_string(),
        ];
        let result = classifier.classify(messages.as_slice());
        assert_eq!(
            result.groups.commit_count() + result.unmatched.len(),
            messages.len()
        );
        assert_eq!(
            result.unmatched,
            vec!["nothing".to_string(), "also nothing".to_string()]
        );
        assert_eq!(
            result.groups.get(&IssueKey::new("CORE-1")).unwrap(),
            &["a".to_string(), "c".to_string()]
        );
    }
}
