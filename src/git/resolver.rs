use globset::{Glob, GlobMatcher};
use tracing::debug;

use crate::domain::{RevisionRange, RevisionRef};
use crate::error::{FixVersionError, Result};
use crate::git::Repository;

/// Resolves tag expressions such as `app-*` or `v1.2.0` to concrete revisions
pub struct RevisionRangeResolver<'a, R: Repository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: Repository + ?Sized> RevisionRangeResolver<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        RevisionRangeResolver { repo }
    }

    /// Resolve one tag expression.
    ///
    /// An absent or blank expression means HEAD. Otherwise the expression is a
    /// glob matched against whole tag names, and the matching tag with the most
    /// recent commit time wins.
    ///
    /// # Returns
    /// * `Ok(RevisionRef)` - HEAD or the most recent matching tag
    /// * `Err(FixVersionError::TagNotFound)` - No tag matches the expression
    /// * `Err(FixVersionError::Config)` - The expression is not a valid glob
    pub fn resolve(&self, expression: Option<&str>) -> Result<RevisionRef> {
        let expression = match expression.map(str::trim) {
            Some(expr) if !expr.is_empty() => expr,
            _ => return Ok(RevisionRef::Head),
        };

        let matcher = compile_tag_glob(expression)?;
        let tags = self.repo.tags_by_commit_time()?;

        let tag = tags
            .into_iter()
            .find(|tag| matcher.is_match(&tag.name))
            .ok_or_else(|| FixVersionError::tag_not_found(expression))?;

        debug!(expression, tag = %tag.name, "resolved tag expression");
        Ok(RevisionRef::Tag {
            name: tag.name,
            oid: tag.oid,
        })
    }

    /// Resolve both ends of the release range independently
    pub fn resolve_range(
        &self,
        release: Option<&str>,
        previous: Option<&str>,
    ) -> Result<RevisionRange> {
        Ok(RevisionRange {
            release: self.resolve(release)?,
            previous: self.resolve(previous)?,
        })
    }
}

fn compile_tag_glob(expression: &str) -> Result<GlobMatcher> {
    Glob::new(expression)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| {
            FixVersionError::config(format!("Invalid tag expression '{}': {}", expression, e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TagInfo;
    use crate::git::MockRepository;
    use git2::Oid;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    fn repo_with_tags() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.add_tag(TagInfo::new("app-2024-01-01T00.00.00Z", oid(1), 100));
        repo.add_tag(TagInfo::new("app-2024-02-01T00.00.00Z", oid(2), 200));
        repo.add_tag(TagInfo::new("other-2024-03-01", oid(3), 300));
        repo.add_tag(TagInfo::new("v1.0.0", oid(4), 50));
        repo
    }

    #[test]
    fn test_wildcard_picks_most_recent() {
        let repo = repo_with_tags();
        let resolver = RevisionRangeResolver::new(&repo);
        let revision = resolver.resolve(Some("app-*")).unwrap();
        assert_eq!(
            revision,
            RevisionRef::Tag {
                name: "app-2024-02-01T00.00.00Z".to_string(),
                oid: oid(2)
            }
        );
    }

    #[test]
    fn test_exact_name() {
        let repo = repo_with_tags();
        let resolver = RevisionRangeResolver::new(&repo);
        let revision = resolver.resolve(Some("v1.0.0")).unwrap();
        assert_eq!(revision.to_string(), "v1.0.0");
    }

    #[test]
    fn test_exact_name_is_not_a_prefix_match() {
        let repo = repo_with_tags();
        let resolver = RevisionRangeResolver::new(&repo);
        let result = resolver.resolve(Some("v1.0"));
        assert!(matches!(result, Err(FixVersionError::TagNotFound(_))));
    }

    #[test]
    fn test_absent_expression_is_head() {
        let repo = repo_with_tags();
        let resolver = RevisionRangeResolver::new(&repo);
        assert_eq!(resolver.resolve(None).unwrap(), RevisionRef::Head);
        assert_eq!(resolver.resolve(Some("  ")).unwrap(), RevisionRef::Head);
    }

    #[test]
    fn test_no_match() {
        let repo = repo_with_tags();
        let resolver = RevisionRangeResolver::new(&repo);
        let err = resolver.resolve(Some("missing-*")).unwrap_err();
        assert_eq!(err.to_string(), "Could not find tag: missing-*");
    }

    #[test]
    fn test_invalid_glob() {
        let repo = repo_with_tags();
        let resolver = RevisionRangeResolver::new(&repo);
        let result = resolver.resolve(Some("app-[*"));
        assert!(matches!(result, Err(FixVersionError::Config(_))));
    }

    #[test]
    fn test_resolve_range() {
        let repo = repo_with_tags();
        let resolver = RevisionRangeResolver::new(&repo);
        let range = resolver.resolve_range(None, Some("app-*")).unwrap();
        assert_eq!(range.release, RevisionRef::Head);
        assert_eq!(range.previous.to_string(), "app-2024-02-01T00.00.00Z");
    }
}
