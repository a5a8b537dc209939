//! Rule selection and tag scoping.
//!
//! Given an image name, a [`RuleSet`] selects the retention rule that
//! applies: the first exception (in configuration order) whose name matcher
//! matches wins, otherwise the default rule. When an exception applies, its
//! tag matcher partitions the image's tags into an in-scope list handed to
//! the evaluator and an excluded list that is only ever reported.

use crate::error::Result;
use crate::image::Tag;
use crate::rule::{ExceptionRule, RetentionRule};

/// Audit label used when the default rule applies.
pub const DEFAULT_RULE_LABEL: &str = "default";

/// The immutable rule configuration for one run.
#[derive(Debug, Clone)]
pub struct RuleSet {
    default_rule: RetentionRule,
    exceptions: Vec<ExceptionRule>,
}

/// Outcome of rule selection for one image.
#[derive(Debug, Clone, Copy)]
pub struct SelectedRule<'a> {
    /// The retention rule to evaluate with.
    pub rule: &'a RetentionRule,

    /// Audit label: the exception's name matcher pattern, or `"default"`.
    pub label: &'a str,

    /// The matching exception, when one applied.
    pub exception: Option<&'a ExceptionRule>,
}

impl RuleSet {
    /// Creates a rule set, validating the default rule.
    ///
    /// Exception rules are validated when compiled
    /// ([`ExceptionRule::compile`]), so by construction every rule in a
    /// `RuleSet` satisfies the at-least-one-criterion invariant.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the default rule is invalid.
    pub fn new(default_rule: RetentionRule, exceptions: Vec<ExceptionRule>) -> Result<Self> {
        default_rule.validate()?;
        Ok(Self {
            default_rule,
            exceptions,
        })
    }

    /// The default retention rule.
    #[must_use]
    pub const fn default_rule(&self) -> &RetentionRule {
        &self.default_rule
    }

    /// The configured exception rules, in configuration order.
    #[must_use]
    pub fn exceptions(&self) -> &[ExceptionRule] {
        &self.exceptions
    }

    /// Selects the rule that applies to an image.
    ///
    /// At most one rule ever applies per image: the first matching exception
    /// in configuration order, or the default. Two exceptions with the same
    /// name matcher and disjoint tag matchers will not both apply to one
    /// image; only the first is consulted.
    ///
    /// # Examples
    ///
    /// ```
    /// use lethe_core::{ExceptionRule, RetentionRule, RuleSet};
    ///
    /// let exceptions = vec![
    ///     ExceptionRule::compile("^foo", None, RetentionRule::new(5, 0, false))?,
    ///     ExceptionRule::compile("^fo", None, RetentionRule::new(1, 0, false))?,
    /// ];
    /// let rules = RuleSet::new(RetentionRule::new(10, 0, true), exceptions)?;
    ///
    /// let selected = rules.select("foobar");
    /// assert_eq!(selected.label, "^foo");
    ///
    /// let selected = rules.select("unrelated");
    /// assert_eq!(selected.label, "default");
    /// # Ok::<(), lethe_core::Error>(())
    /// ```
    #[must_use]
    pub fn select<'a>(&'a self, image_name: &str) -> SelectedRule<'a> {
        for exception in &self.exceptions {
            if exception.matches_image(image_name) {
                return SelectedRule {
                    rule: exception.rule(),
                    label: exception.label(),
                    exception: Some(exception),
                };
            }
        }
        SelectedRule {
            rule: &self.default_rule,
            label: DEFAULT_RULE_LABEL,
            exception: None,
        }
    }
}

/// Partitions tags into those in scope for an exception and those excluded.
///
/// A tag is excluded iff its name does not match the exception's tag
/// matcher. Excluded tags are invisible to both retention criteria and are
/// reported only as excluded, never as kept or deleted. Relative order is
/// preserved in both halves, so an in-scope list built from a newest-first
/// input is still newest-first.
#[must_use]
pub fn partition_tags(tags: &[Tag], exception: &ExceptionRule) -> (Vec<Tag>, Vec<Tag>) {
    tags.iter()
        .cloned()
        .partition(|tag| exception.matches_tag(&tag.name))
}
