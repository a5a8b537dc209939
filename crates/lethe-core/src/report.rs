//! Structured verdicts and audit-line rendering.
//!
//! Every scanned tag receives exactly one [`Verdict`]. The rendered lines
//! are a textual contract: other tooling parses them (notably in dry-run
//! mode), so their shape is stable: one padded line per tag plus one
//! "marking image" line announcing the applied rule.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width tag names are padded to in audit lines.
const TAG_PAD_WIDTH: usize = 40;

/// Per-tag outcome of an evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The tag did not match the applied exception's tag matcher. It was
    /// invisible to both retention criteria: neither kept nor deleted.
    Excluded,

    /// Both retention criteria marked the tag; it will be deleted.
    Delete,

    /// At least one retention criterion protects the tag.
    Retain,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Excluded => "excluded",
            Self::Delete => "delete",
            Self::Retain => "retain",
        };
        write!(f, "{s}")
    }
}

/// A tag name together with its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagVerdict {
    /// Tag name.
    pub name: String,

    /// Outcome for this tag.
    pub verdict: Verdict,
}

impl TagVerdict {
    /// Creates a verdict for a tag.
    #[must_use]
    pub fn new(name: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            name: name.into(),
            verdict,
        }
    }
}

/// The evaluation outcome for one image.
///
/// Verdicts hold excluded tags first (in scan order), then evaluated tags in
/// newest-first order, which is the order [`ImageReport::render`] emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReport {
    /// Repository name.
    pub image: String,

    /// Audit label of the applied rule: a name matcher pattern or
    /// `"default"`.
    pub rule_label: String,

    /// One verdict per scanned tag.
    pub verdicts: Vec<TagVerdict>,
}

impl ImageReport {
    /// Creates a report.
    #[must_use]
    pub fn new(
        image: impl Into<String>,
        rule_label: impl Into<String>,
        verdicts: Vec<TagVerdict>,
    ) -> Self {
        Self {
            image: image.into(),
            rule_label: rule_label.into(),
            verdicts,
        }
    }

    /// Tag names with verdict [`Verdict::Delete`], in verdict order.
    #[must_use]
    pub fn deletions(&self) -> Vec<&str> {
        self.verdicts
            .iter()
            .filter(|v| v.verdict == Verdict::Delete)
            .map(|v| v.name.as_str())
            .collect()
    }

    /// Renders the audit lines for this image.
    ///
    /// Excluded-tag lines come first, then the "marking image" line, then
    /// one line per evaluated tag:
    ///
    /// ```text
    ///   nightly-17                              excluded
    /// marking image [team/api] using [^team/] retention policy
    ///   v2.1.0                                  retain
    ///   v1.0.0                                  delete
    /// ```
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.verdicts.len() + 1);
        for v in self
            .verdicts
            .iter()
            .filter(|v| v.verdict == Verdict::Excluded)
        {
            lines.push(format!("  {}{}", pad_right(&v.name), v.verdict));
        }
        lines.push(format!(
            "marking image [{}] using [{}] retention policy",
            self.image, self.rule_label
        ));
        for v in self
            .verdicts
            .iter()
            .filter(|v| v.verdict != Verdict::Excluded)
        {
            lines.push(format!("  {}{}", pad_right(&v.name), v.verdict));
        }
        lines
    }
}

/// Pads a tag name with spaces to the audit column width.
///
/// Names longer than the width get exactly one trailing space so the
/// verdict never abuts the name.
fn pad_right(name: &str) -> String {
    if name.len() > TAG_PAD_WIDTH {
        format!("{name} ")
    } else {
        format!("{name:<TAG_PAD_WIDTH$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Excluded.to_string(), "excluded");
        assert_eq!(Verdict::Delete.to_string(), "delete");
        assert_eq!(Verdict::Retain.to_string(), "retain");
    }

    #[test]
    fn test_deletions_filters_and_preserves_order() {
        let report = ImageReport::new(
            "team/api",
            "default",
            vec![
                TagVerdict::new("v3", Verdict::Retain),
                TagVerdict::new("v2", Verdict::Delete),
                TagVerdict::new("v1", Verdict::Delete),
            ],
        );
        assert_eq!(report.deletions(), vec!["v2", "v1"]);
    }

    #[test]
    fn test_render_line_shape() {
        let report = ImageReport::new(
            "team/api",
            "default",
            vec![TagVerdict::new("v1", Verdict::Retain)],
        );
        let lines = report.render();
        assert_eq!(
            lines[0],
            "marking image [team/api] using [default] retention policy"
        );
        assert_eq!(lines[1].len(), 2 + 40 + "retain".len());
        assert!(lines[1].starts_with("  v1 "));
        assert!(lines[1].ends_with("retain"));
    }

    #[test]
    fn test_render_excluded_before_marking_line() {
        let report = ImageReport::new(
            "team/api",
            "^team/",
            vec![
                TagVerdict::new("nightly-1", Verdict::Excluded),
                TagVerdict::new("v1", Verdict::Delete),
            ],
        );
        let lines = report.render();
        assert!(lines[0].contains("nightly-1"));
        assert!(lines[0].ends_with("excluded"));
        assert!(lines[1].starts_with("marking image [team/api]"));
        assert!(lines[2].ends_with("delete"));
    }

    #[test]
    fn test_verdict_serializes_lowercase() {
        let report = ImageReport::new(
            "team/api",
            "default",
            vec![TagVerdict::new("v1", Verdict::Delete)],
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verdicts"][0]["verdict"], "delete");
    }

    #[test]
    fn test_pad_right_overlong_name_gets_single_space() {
        let long = "x".repeat(45);
        let padded = pad_right(&long);
        assert_eq!(padded, format!("{long} "));
    }
}
