//! Docker Registry HTTP API v2 wire types.
//!
//! Only the fields the cleaner consumes are modeled; registries send more
//! and serde ignores the rest.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Media type requested for manifests, schema 2.
pub const MANIFEST_V2_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Response header carrying a manifest's content digest.
pub const CONTENT_DIGEST_HEADER: &str = "Docker-Content-Digest";

/// `GET /v2/_catalog` response.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// Repository names visible in the registry.
    pub repositories: Vec<String>,
}

/// `GET /v2/<name>/tags/list` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TagList {
    /// Repository name.
    pub name: String,

    /// Tag names. Registries return `null` for untagged repositories.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TagList {
    /// Returns the tag names, treating a `null` list as empty.
    #[must_use]
    pub fn into_tags(self) -> Vec<String> {
        self.tags.unwrap_or_default()
    }
}

/// `GET /v2/<name>/manifests/<reference>` response (schema 2).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestV2 {
    /// Manifest schema version (2).
    pub schema_version: u32,

    /// Descriptor of the image configuration blob.
    pub config: Descriptor,
}

/// A content descriptor within a manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Media type of the referenced content.
    pub media_type: String,

    /// Digest of the referenced content.
    pub digest: String,

    /// Size in bytes.
    pub size: u64,
}

/// Image configuration blob, `GET /v2/<name>/blobs/<digest>`.
///
/// The cleaner only needs the creation timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigBlob {
    /// When the image was created.
    pub created: DateTime<Utc>,
}
