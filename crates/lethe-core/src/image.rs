//! Image and tag snapshot model.
//!
//! An [`Image`] is a transient, per-run snapshot of one repository's tag
//! history, assembled from live registry data and discarded when the run
//! ends. Nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named pointer to one manifest within a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name (e.g., "v1.2.0", "latest").
    pub name: String,

    /// Content digest of the manifest the tag points at. Registries delete
    /// by digest, not by tag name, so this is the actual deletion target.
    pub content_digest: String,

    /// When the tagged image was created.
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Creates a new tag.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content_digest: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            content_digest: content_digest.into(),
            created_at,
        }
    }
}

/// A repository and its full tag history.
///
/// Retention evaluation assumes `tags` is sorted newest-first; callers must
/// establish that with [`Image::sort_tags_newest_first`] before evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Repository name as reported by the registry catalog.
    pub name: String,

    /// Tag history, newest first once sorted.
    pub tags: Vec<Tag>,
}

impl Image {
    /// Creates an empty image snapshot.
    ///
    /// # Examples
    ///
    /// ```
    /// use lethe_core::Image;
    ///
    /// let image = Image::new("team/api");
    /// assert_eq!(image.name, "team/api");
    /// assert!(image.tags.is_empty());
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
        }
    }

    /// Sorts the tag list by creation time, newest first.
    ///
    /// The count criterion of retention evaluation protects the first
    /// `tags_to_keep` entries, so this ordering is an invariant that must
    /// hold before evaluation.
    pub fn sort_tags_newest_first(&mut self) {
        self.tags
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    /// Looks up the content digest for a tag name, if present.
    #[must_use]
    pub fn digest_for(&self, tag_name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name == tag_name)
            .map(|t| t.content_digest.as_str())
    }
}
