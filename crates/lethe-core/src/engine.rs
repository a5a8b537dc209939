//! Policy engine orchestration.
//!
//! The engine drives one stateless pass over a registry: enumerate
//! repositories, build each image's tag snapshot, select a rule, evaluate,
//! and (unless dry-running) delete every tag both criteria marked. The
//! registry itself is reached through the [`RegistryBackend`] trait so the
//! engine can be exercised against an in-memory fake.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{BackendError, Error, Result};
use crate::evaluator::evaluate;
use crate::image::{Image, Tag};
use crate::matcher::{partition_tags, RuleSet};
use crate::report::{ImageReport, TagVerdict, Verdict};

/// Registry operations the engine consumes.
///
/// Implementations talk to a real registry over HTTP; tests substitute an
/// in-memory fake. All methods are read-only except [`delete_tag`], which
/// removes a manifest by content digest (registries delete by digest, not by
/// tag name).
///
/// [`delete_tag`]: RegistryBackend::delete_tag
#[async_trait]
pub trait RegistryBackend: Send + Sync {
    /// Lists all repositories visible in the registry catalog.
    async fn list_repositories(&self) -> std::result::Result<Vec<String>, BackendError>;

    /// Lists the tag names of a repository.
    async fn list_tags(&self, repository: &str) -> std::result::Result<Vec<String>, BackendError>;

    /// Returns when the image a tag points at was created.
    async fn tag_created_at(
        &self,
        repository: &str,
        tag: &str,
    ) -> std::result::Result<DateTime<Utc>, BackendError>;

    /// Returns the content digest of the manifest a tag points at.
    async fn tag_content_digest(
        &self,
        repository: &str,
        tag: &str,
    ) -> std::result::Result<String, BackendError>;

    /// Deletes a manifest by content digest.
    async fn delete_tag(
        &self,
        repository: &str,
        content_digest: &str,
    ) -> std::result::Result<(), BackendError>;
}

/// Summary of one engine run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Per-image evaluation reports, in catalog order.
    pub reports: Vec<ImageReport>,

    /// `(image, tag)` pairs deleted (or, in dry-run mode, that would have
    /// been deleted), in issue order.
    pub deletions: Vec<(String, String)>,

    /// Whether delete calls were suppressed.
    pub dry_run: bool,
}

/// One image's scan result: the snapshot plus its evaluation report.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    /// The scanned tag snapshot, newest first.
    pub image: Image,

    /// The evaluation report for the snapshot.
    pub report: ImageReport,
}

/// The retention-policy engine.
///
/// Owns the immutable rule configuration for a run; all registry access
/// goes through the [`RegistryBackend`] passed to [`Engine::run`].
#[derive(Debug, Clone)]
pub struct Engine {
    rules: RuleSet,
}

impl Engine {
    /// Creates an engine from a validated rule set.
    #[must_use]
    pub const fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Runs a full scan-then-cleanup pass.
    ///
    /// The scan phase walks every repository sequentially and evaluates it;
    /// any failure there aborts the run before a single deletion is issued,
    /// so deletions never run against a partially scanned registry. The
    /// cleanup phase then deletes marked tags one at a time in report order;
    /// the first failure aborts the remainder. With `dry_run` set the
    /// cleanup phase is skipped entirely and the summary reports what would
    /// have been deleted.
    ///
    /// Audit lines (the per-tag verdict lines and per-image rule lines) are
    /// printed to stdout as the scan proceeds; they are a stable textual
    /// contract. Diagnostics go through `tracing`.
    ///
    /// # Errors
    ///
    /// Returns the first registry error encountered, or
    /// [`Error::TagNotFound`] if a marked tag vanished from the in-memory
    /// snapshot before its digest lookup.
    pub async fn run(&self, backend: &dyn RegistryBackend, dry_run: bool) -> Result<RunSummary> {
        println!("scanning the registry");
        let entries = self.scan(backend).await?;
        println!("scan completed");

        let mut deletions = Vec::new();
        if dry_run {
            for entry in &entries {
                for tag in entry.report.deletions() {
                    deletions.push((entry.image.name.clone(), tag.to_string()));
                }
            }
            tracing::info!(deletions = deletions.len(), "Dry run, skipping cleanup");
        } else {
            println!("cleaning up images");
            for entry in &entries {
                for tag in entry.report.deletions() {
                    self.delete(backend, &entry.image, tag).await?;
                    deletions.push((entry.image.name.clone(), tag.to_string()));
                }
            }
            println!("cleanup completed");
        }

        Ok(RunSummary {
            reports: entries.into_iter().map(|e| e.report).collect(),
            deletions,
            dry_run,
        })
    }

    /// Scans every repository and evaluates it, printing audit lines.
    async fn scan(&self, backend: &dyn RegistryBackend) -> Result<Vec<ScanEntry>> {
        let repositories = backend.list_repositories().await?;
        tracing::debug!(count = repositories.len(), "Listed repositories");

        let mut entries = Vec::with_capacity(repositories.len());
        for name in repositories {
            let image = load_image(backend, &name).await?;
            let report = self.evaluate_image(&image);
            for line in report.render() {
                println!("{line}");
            }
            entries.push(ScanEntry { image, report });
        }
        Ok(entries)
    }

    /// Evaluates one sorted image snapshot against the rule set.
    ///
    /// Pure apart from reading the current time; exposed for tests and
    /// library callers that bring their own snapshots.
    #[must_use]
    pub fn evaluate_image(&self, image: &Image) -> ImageReport {
        let selected = self.rules.select(&image.name);

        let (in_scope, excluded) = selected.exception.map_or_else(
            || (image.tags.clone(), Vec::new()),
            |exception| partition_tags(&image.tags, exception),
        );

        let mut verdicts: Vec<TagVerdict> = excluded
            .iter()
            .map(|tag| TagVerdict::new(&tag.name, Verdict::Excluded))
            .collect();
        verdicts.extend(evaluate(&in_scope, selected.rule, Utc::now()));

        tracing::debug!(
            image = %image.name,
            rule = %selected.label,
            excluded = excluded.len(),
            evaluated = in_scope.len(),
            "Evaluated image"
        );
        ImageReport::new(&image.name, selected.label, verdicts)
    }

    /// Deletes one tag, resolving its digest from the snapshot.
    async fn delete(
        &self,
        backend: &dyn RegistryBackend,
        image: &Image,
        tag: &str,
    ) -> Result<()> {
        let digest = image.digest_for(tag).ok_or_else(|| Error::TagNotFound {
            image: image.name.clone(),
            tag: tag.to_string(),
        })?;
        println!("deleting image [{}:{tag}]", image.name);
        backend.delete_tag(&image.name, digest).await?;
        tracing::info!(image = %image.name, tag, digest, "Deleted tag");
        Ok(())
    }
}

/// Builds a sorted tag snapshot for one repository.
async fn load_image(backend: &dyn RegistryBackend, name: &str) -> Result<Image> {
    let mut image = Image::new(name);
    for tag_name in backend.list_tags(name).await? {
        let created_at = backend.tag_created_at(name, &tag_name).await?;
        let content_digest = backend.tag_content_digest(name, &tag_name).await?;
        image
            .tags
            .push(Tag::new(tag_name, content_digest, created_at));
    }
    image.sort_tags_newest_first();
    Ok(image)
}
