use regex::Regex;

use crate::domain::IssueKey;
use crate::error::{FixVersionError, Result};

/// Pattern used when neither the CLI nor the config file provide one.
///
/// Matches subjects such as `CORE-12: fix bug` or `CORE-12 fix bug`.
pub const DEFAULT_COMMIT_PATTERN: &str = r"^(?P<key>\w*-\d*)[ :-](?P<value>.*)";

/// A compiled commit pattern that extracts an issue key and a message fragment.
///
/// The pattern may name its groups `key` and `value`. Any group that is not
/// named falls back to its positional slot: group 1 for the key, group 2 for
/// the value. Group indices are resolved once here, never per line.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
    key_group: usize,
    value_group: usize,
}

impl PatternMatcher {
    /// Compile a user supplied pattern.
    ///
    /// # Returns
    /// * `Ok(PatternMatcher)` - Pattern compiled and both groups resolved
    /// * `Err(FixVersionError::Pattern)` - Invalid expression, or the groups it refers to don't exist
    pub fn compile(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| FixVersionError::pattern(e.to_string()))?;

        let mut key_group = 1;
        let mut value_group = 2;
        for (index, name) in regex.capture_names().enumerate() {
            match name {
                Some("key") => key_group = index,
                Some("value") => value_group = index,
                _ => {}
            }
        }

        // captures_len counts the implicit whole-match group 0
        let group_count = regex.captures_len();
        if key_group >= group_count || value_group >= group_count {
            return Err(FixVersionError::pattern(format!(
                "'{}' needs a key and a value group (named or positional)",
                pattern
            )));
        }

        Ok(PatternMatcher {
            regex,
            key_group,
            value_group,
        })
    }

    /// The pattern text as supplied
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Search a commit subject for the first match anywhere in the line.
    ///
    /// The key is trimmed and uppercased, the value is trimmed. A match whose
    /// key group did not participate counts as no match; a missing value
    /// group yields an empty fragment.
    pub fn extract(&self, line: &str) -> Option<(IssueKey, String)> {
        let captures = self.regex.captures(line)?;
        let key = captures.get(self.key_group)?;
        let value = captures
            .get(self.value_group)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        Some((IssueKey::new(key.as_str()), value))
    }
}
