//! Retention rules and load-time validation.
//!
//! Rules are plain values: a single [`RetentionRule`] shape serves both the
//! default rule and exception rules, so the evaluator has exactly one code
//! path. Exception matchers are compiled regexes; compilation failures are
//! configuration errors raised before any registry interaction.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How many recent tags and how many days of tags survive cleanup.
///
/// A criterion set to zero is disabled: it imposes no protection and no
/// marking of its own. A rule with both criteria disabled would keep
/// nothing, so it is rejected by [`RetentionRule::validate`] at
/// configuration-load time; the evaluator never sees one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionRule {
    /// Number of most-recent tags protected from deletion (0 = disabled).
    pub tags_to_keep: usize,

    /// Age in days within which tags are protected from deletion
    /// (0 = disabled).
    pub days_to_keep: u32,

    /// Whether a tag named "latest" is exempt from both criteria.
    pub keep_latest: bool,
}

impl RetentionRule {
    /// Creates a rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use lethe_core::RetentionRule;
    ///
    /// let rule = RetentionRule::new(10, 0, true);
    /// assert!(rule.validate().is_ok());
    /// ```
    #[must_use]
    pub const fn new(tags_to_keep: usize, days_to_keep: u32, keep_latest: bool) -> Self {
        Self {
            tags_to_keep,
            days_to_keep,
            keep_latest,
        }
    }

    /// Checks the rule invariant: at least one criterion must be active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRule`] when both criteria are zero.
    pub fn validate(&self) -> Result<()> {
        if self.tags_to_keep == 0 && self.days_to_keep == 0 {
            return Err(Error::InvalidRule {
                reason: "TagsToKeep and DaysToKeep are both empty".to_string(),
            });
        }
        Ok(())
    }
}

/// A retention rule scoped to image names matching a pattern.
///
/// The name matcher selects which images the rule applies to; the tag
/// matcher narrows which of those images' tags are in scope (non-matching
/// tags are excluded from evaluation entirely). Both are unanchored
/// searches, mirroring how operators write registry path fragments.
#[derive(Debug, Clone)]
pub struct ExceptionRule {
    name_matcher: Regex,
    tag_matcher: Regex,
    rule: RetentionRule,
}

impl ExceptionRule {
    /// Compiles an exception rule from pattern strings.
    ///
    /// A missing tag matcher defaults to matching every tag.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either pattern fails to compile or
    /// the retention rule fails [`RetentionRule::validate`].
    pub fn compile(
        name_pattern: &str,
        tag_pattern: Option<&str>,
        rule: RetentionRule,
    ) -> Result<Self> {
        rule.validate()?;

        let name_matcher = Regex::new(name_pattern).map_err(|source| Error::InvalidNameMatcher {
            pattern: name_pattern.to_string(),
            source,
        })?;

        let tag_pattern = tag_pattern.unwrap_or(".*");
        let tag_matcher = Regex::new(tag_pattern).map_err(|source| Error::InvalidTagMatcher {
            pattern: tag_pattern.to_string(),
            source,
        })?;

        Ok(Self {
            name_matcher,
            tag_matcher,
            rule,
        })
    }

    /// Returns whether this exception applies to the given image name.
    #[must_use]
    pub fn matches_image(&self, image_name: &str) -> bool {
        self.name_matcher.is_match(image_name)
    }

    /// Returns whether a tag name is in scope for this exception.
    #[must_use]
    pub fn matches_tag(&self, tag_name: &str) -> bool {
        self.tag_matcher.is_match(tag_name)
    }

    /// The retention rule this exception applies.
    #[must_use]
    pub const fn rule(&self) -> &RetentionRule {
        &self.rule
    }

    /// The name matcher pattern, used as the rule's audit label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name_matcher.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_with_count_only_is_valid() {
        assert!(RetentionRule::new(5, 0, false).validate().is_ok());
    }

    #[test]
    fn test_rule_with_days_only_is_valid() {
        assert!(RetentionRule::new(0, 30, false).validate().is_ok());
    }

    #[test]
    fn test_vacuous_rule_is_rejected() {
        let err = RetentionRule::new(0, 0, true).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidRule { .. }));
    }

    #[test]
    fn test_compile_defaults_tag_matcher_to_match_all() {
        let ex = ExceptionRule::compile("^team/", None, RetentionRule::new(3, 0, false)).unwrap();
        assert!(ex.matches_tag("anything-at-all"));
    }

    #[test]
    fn test_compile_rejects_bad_name_pattern() {
        let err = ExceptionRule::compile("(unclosed", None, RetentionRule::new(3, 0, false))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidNameMatcher { .. }));
    }

    #[test]
    fn test_compile_rejects_bad_tag_pattern() {
        let err = ExceptionRule::compile("^team/", Some("["), RetentionRule::new(3, 0, false))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTagMatcher { .. }));
    }

    #[test]
    fn test_compile_rejects_vacuous_rule() {
        let err = ExceptionRule::compile("^team/", None, RetentionRule::new(0, 0, true))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRule { .. }));
    }

    #[test]
    fn test_name_match_is_unanchored_search() {
        let ex = ExceptionRule::compile("api", None, RetentionRule::new(3, 0, false)).unwrap();
        assert!(ex.matches_image("team/api-server"));
        assert!(!ex.matches_image("team/web"));
    }
}
