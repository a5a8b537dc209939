//! Docker Registry HTTP API v2 client.
//!
//! This module provides the HTTP client the policy engine scans and cleans
//! registries through. It implements [`lethe_core::RegistryBackend`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;

use lethe_core::{BackendError, RegistryBackend};

use crate::config::{RegistryAuth, RegistryConfig};
use crate::error::RegistryError;
use crate::wire::{Catalog, ConfigBlob, ManifestV2, TagList, CONTENT_DIGEST_HEADER, MANIFEST_V2_MEDIA_TYPE};

/// Client for Docker Registry v2 / OCI-distribution-compatible registries.
#[derive(Debug)]
pub struct RegistryClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Creates a new registry client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use lethe_registry::{RegistryClient, RegistryConfig};
    ///
    /// let config = RegistryConfig::new("https://registry.example.com");
    /// let client = RegistryClient::new(config)?;
    /// # Ok::<(), lethe_registry::RegistryError>(())
    /// ```
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent);

        if config.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|source| RegistryError::ConnectionFailed {
            url: config.url.clone(),
            source,
        })?;

        Ok(Self { config, http })
    }

    /// Returns the registry configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Lists all repositories in the registry catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be contacted or responds
    /// with a non-success status.
    pub async fn list_repositories(&self) -> Result<Vec<String>, RegistryError> {
        let catalog: Catalog = self.get_json(&format!("{}/v2/_catalog", self.config.url)).await?;
        Ok(catalog.repositories)
    }

    /// Lists the tags of a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag list cannot be retrieved.
    pub async fn list_tags(&self, repository: &str) -> Result<Vec<String>, RegistryError> {
        let url = format!("{}/v2/{repository}/tags/list", self.config.url);
        let tags: TagList = self.get_json(&url).await?;
        Ok(tags.into_tags())
    }

    /// Returns the content digest of the manifest a tag points at.
    ///
    /// The digest comes from the `Docker-Content-Digest` response header;
    /// it is the value registries accept for manifest deletion.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be fetched or the header is
    /// absent.
    pub async fn tag_content_digest(
        &self,
        repository: &str,
        tag: &str,
    ) -> Result<String, RegistryError> {
        let url = format!("{}/v2/{repository}/manifests/{tag}", self.config.url);
        let response = self
            .http
            .get(&url)
            .headers(self.auth_headers()?)
            .header(ACCEPT, MANIFEST_V2_MEDIA_TYPE)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        response
            .headers()
            .get(CONTENT_DIGEST_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
            .ok_or_else(|| RegistryError::MissingContentDigest {
                repository: repository.to_string(),
                tag: tag.to_string(),
            })
    }

    /// Returns when the image a tag points at was created.
    ///
    /// Resolves the tag's manifest, then reads the creation timestamp from
    /// the image configuration blob the manifest references.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or config blob cannot be fetched.
    pub async fn tag_created_at(
        &self,
        repository: &str,
        tag: &str,
    ) -> Result<DateTime<Utc>, RegistryError> {
        let url = format!("{}/v2/{repository}/manifests/{tag}", self.config.url);
        let manifest: ManifestV2 = self.get_json_accept(&url, MANIFEST_V2_MEDIA_TYPE).await?;

        let blob_url = format!(
            "{}/v2/{repository}/blobs/{}",
            self.config.url, manifest.config.digest
        );
        let blob: ConfigBlob = self.get_json(&blob_url).await?;
        Ok(blob.created)
    }

    /// Deletes a manifest by content digest.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the deletion (manifest
    /// deletion is often disabled server-side; Docker Registry requires
    /// `REGISTRY_STORAGE_DELETE_ENABLED=true`).
    pub async fn delete_manifest(
        &self,
        repository: &str,
        content_digest: &str,
    ) -> Result<(), RegistryError> {
        let url = format!(
            "{}/v2/{repository}/manifests/{content_digest}",
            self.config.url
        );
        let response = self
            .http
            .delete(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;
        Self::check_status(response).await?;

        tracing::debug!(repository, digest = content_digest, "Deleted manifest");
        Ok(())
    }

    /// Sends a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RegistryError> {
        let response = self
            .http
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        response.json().await.map_err(Into::into)
    }

    /// Sends a GET request with an explicit Accept header and decodes JSON.
    async fn get_json_accept<T: DeserializeOwned>(
        &self,
        url: &str,
        accept: &str,
    ) -> Result<T, RegistryError> {
        let response = self
            .http
            .get(url)
            .headers(self.auth_headers()?)
            .header(ACCEPT, accept)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        response.json().await.map_err(Into::into)
    }

    /// Maps non-success responses to [`RegistryError::Http`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RegistryError> {
        if response.status().is_success() {
            return Ok(response);
        }
        Err(RegistryError::Http {
            status: response.status().as_u16(),
            message: response.text().await.unwrap_or_default(),
        })
    }

    /// Creates authentication headers based on configuration.
    fn auth_headers(&self) -> Result<HeaderMap, RegistryError> {
        let mut headers = HeaderMap::new();

        match &self.config.auth {
            RegistryAuth::None => {}
            RegistryAuth::Basic { username, password } => {
                let credentials = base64::Engine::encode(
                    &base64::engine::general_purpose::STANDARD,
                    format!("{username}:{password}"),
                );
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Basic {credentials}")).map_err(|_| {
                        RegistryError::AuthenticationFailed {
                            message: "Invalid credentials".to_string(),
                        }
                    })?,
                );
            }
            RegistryAuth::Bearer { token } => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                        RegistryError::AuthenticationFailed {
                            message: "Invalid token".to_string(),
                        }
                    })?,
                );
            }
        }

        Ok(headers)
    }
}

#[async_trait]
impl RegistryBackend for RegistryClient {
    async fn list_repositories(&self) -> Result<Vec<String>, BackendError> {
        Self::list_repositories(self).await.map_err(Into::into)
    }

    async fn list_tags(&self, repository: &str) -> Result<Vec<String>, BackendError> {
        Self::list_tags(self, repository).await.map_err(Into::into)
    }

    async fn tag_created_at(
        &self,
        repository: &str,
        tag: &str,
    ) -> Result<DateTime<Utc>, BackendError> {
        Self::tag_created_at(self, repository, tag)
            .await
            .map_err(Into::into)
    }

    async fn tag_content_digest(
        &self,
        repository: &str,
        tag: &str,
    ) -> Result<String, BackendError> {
        Self::tag_content_digest(self, repository, tag)
            .await
            .map_err(Into::into)
    }

    async fn delete_tag(
        &self,
        repository: &str,
        content_digest: &str,
    ) -> Result<(), BackendError> {
        self.delete_manifest(repository, content_digest)
            .await
            .map_err(Into::into)
    }
}
