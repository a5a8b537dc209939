//! Retention evaluation.
//!
//! The evaluator is a pure function from a tag list and a rule to per-tag
//! verdicts. It performs no I/O and takes the current time as an argument;
//! rendering of audit lines happens elsewhere, from the structured verdicts.

use chrono::{DateTime, Duration, Utc};

use crate::image::Tag;
use crate::report::{TagVerdict, Verdict};
use crate::rule::RetentionRule;

/// Name of the tag exempted by a rule's `keep_latest` flag.
pub const LATEST_TAG: &str = "latest";

/// Evaluates a rule against a tag list, producing one verdict per tag.
///
/// `tags` must be sorted newest-first; the first `tags_to_keep` entries are
/// the ones the count criterion protects. Callers pass `now` so results are
/// reproducible in tests.
///
/// Each tag carries two independent marks, one per criterion. A disabled
/// criterion (zero) marks every tag, i.e. it protects nothing. The count
/// criterion marks every tag at position >= `tags_to_keep`; the date
/// criterion marks every tag older than `days_to_keep` days. A tag named
/// `latest` is exempt from both marks when `keep_latest` is set. The final
/// verdict is `Delete` only when both criteria marked the tag, so a tag
/// survives if either criterion still protects it: a very old tag inside
/// the count window is retained, and so is a recent tag beyond the count
/// window while the date window (when configured) has not elapsed.
///
/// Output order equals input order.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use lethe_core::{evaluate, RetentionRule, Tag, Verdict};
///
/// let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
/// let tags = vec![
///     Tag::new("v3", "sha256:c", now - chrono::Duration::days(1)),
///     Tag::new("v2", "sha256:b", now - chrono::Duration::days(2)),
///     Tag::new("v1", "sha256:a", now - chrono::Duration::days(3)),
/// ];
///
/// let verdicts = evaluate(&tags, &RetentionRule::new(2, 0, false), now);
/// assert_eq!(verdicts[0].verdict, Verdict::Retain);
/// assert_eq!(verdicts[1].verdict, Verdict::Retain);
/// assert_eq!(verdicts[2].verdict, Verdict::Delete);
/// ```
#[must_use]
pub fn evaluate(tags: &[Tag], rule: &RetentionRule, now: DateTime<Utc>) -> Vec<TagVerdict> {
    let count_disabled = rule.tags_to_keep == 0;
    let date_disabled = rule.days_to_keep == 0;
    let window = Duration::days(i64::from(rule.days_to_keep));

    tags.iter()
        .enumerate()
        .map(|(position, tag)| {
            let exempt = rule.keep_latest && tag.name == LATEST_TAG;

            let marked_by_count = count_disabled
                || (position >= rule.tags_to_keep && !exempt);
            let marked_by_date = date_disabled
                || (tag.created_at + window < now && !exempt);

            let verdict = if marked_by_count && marked_by_date {
                Verdict::Delete
            } else {
                Verdict::Retain
            };
            TagVerdict::new(&tag.name, verdict)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// Builds tags aged 0, 1, 2, ... days, i.e. already newest-first.
    fn tags_by_age(names: &[&str]) -> Vec<Tag> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Tag::new(
                    *name,
                    format!("sha256:{name}"),
                    now() - Duration::days(i as i64),
                )
            })
            .collect()
    }

    fn deleted(verdicts: &[TagVerdict]) -> Vec<&str> {
        verdicts
            .iter()
            .filter(|v| v.verdict == Verdict::Delete)
            .map(|v| v.name.as_str())
            .collect()
    }

    #[test]
    fn test_empty_tag_list() {
        let verdicts = evaluate(&[], &RetentionRule::new(2, 0, false), now());
        assert!(verdicts.is_empty());
    }

    #[test]
    fn test_count_only_deletes_beyond_window() {
        let tags = tags_by_age(&["t5", "t4", "t3", "t2", "t1"]);
        let verdicts = evaluate(&tags, &RetentionRule::new(2, 0, false), now());
        assert_eq!(deleted(&verdicts), vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn test_count_window_larger_than_history() {
        let tags = tags_by_age(&["t2", "t1"]);
        let verdicts = evaluate(&tags, &RetentionRule::new(5, 0, false), now());
        assert!(deleted(&verdicts).is_empty());
    }

    #[test]
    fn test_date_only_deletes_older_than_window() {
        let tags = vec![
            Tag::new("fresh", "sha256:f", now() - Duration::days(3)),
            Tag::new("stale", "sha256:s", now() - Duration::days(40)),
        ];
        let verdicts = evaluate(&tags, &RetentionRule::new(0, 30, false), now());
        assert_eq!(deleted(&verdicts), vec!["stale"]);
    }

    #[test]
    fn test_date_boundary_is_strict() {
        // Exactly at the window edge is not "older than" the window.
        let tags = vec![Tag::new("edge", "sha256:e", now() - Duration::days(30))];
        let verdicts = evaluate(&tags, &RetentionRule::new(0, 30, false), now());
        assert!(deleted(&verdicts).is_empty());
    }

    #[test]
    fn test_and_combination_protects_either_way() {
        // "ancient" is old enough for the date criterion but sits inside the
        // count window; "recent" is beyond the count window but inside the
        // date window. Neither may be deleted.
        let tags = vec![
            Tag::new("ancient", "sha256:a", now() - Duration::days(400)),
            Tag::new("recent", "sha256:r", now() - Duration::days(2)),
        ];
        let verdicts = evaluate(&tags, &RetentionRule::new(1, 30, false), now());
        assert!(deleted(&verdicts).is_empty());
    }

    #[test]
    fn test_and_combination_deletes_when_both_mark() {
        let tags = vec![
            Tag::new("new", "sha256:n", now() - Duration::days(1)),
            Tag::new("old", "sha256:o", now() - Duration::days(90)),
        ];
        let verdicts = evaluate(&tags, &RetentionRule::new(1, 30, false), now());
        assert_eq!(deleted(&verdicts), vec!["old"]);
    }

    #[test]
    fn test_latest_exempt_from_count() {
        let tags = tags_by_age(&["t5", "t4", "latest", "t2", "t1"]);
        let verdicts = evaluate(&tags, &RetentionRule::new(2, 0, true), now());
        assert_eq!(deleted(&verdicts), vec!["t2", "t1"]);
    }

    #[test]
    fn test_latest_exempt_from_date() {
        let tags = vec![Tag::new("latest", "sha256:l", now() - Duration::days(400))];
        let verdicts = evaluate(&tags, &RetentionRule::new(0, 30, true), now());
        assert!(deleted(&verdicts).is_empty());
    }

    #[test]
    fn test_latest_not_exempt_without_keep_latest() {
        let tags = tags_by_age(&["t3", "t2", "latest"]);
        let verdicts = evaluate(&tags, &RetentionRule::new(2, 0, false), now());
        assert_eq!(deleted(&verdicts), vec!["latest"]);
    }

    #[test]
    fn test_output_order_matches_input_order() {
        let tags = tags_by_age(&["t3", "t2", "t1"]);
        let verdicts = evaluate(&tags, &RetentionRule::new(1, 0, false), now());
        let names: Vec<&str> = verdicts.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["t3", "t2", "t1"]);
    }
}
