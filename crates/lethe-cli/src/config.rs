//! Configuration file loading and validation.
//!
//! The file format is YAML with PascalCase keys, kept compatible with
//! existing cleaner deployments:
//!
//! ```yaml
//! DryRun: true
//! DockerRegistry:
//!   URL: https://registry.example.com
//!   Username: ci
//!   Password: secret
//! RetentionPolicy:
//!   Default:
//!     TagsToKeep: 10
//!     KeepLatest: true
//!   Exceptions:
//!     - NameMatcher: "^team/"
//!       TagMatcher: "^release-"
//!       DaysToKeep: 90
//! ```
//!
//! Everything is validated here, before any registry interaction: retention
//! rules must keep something by at least one criterion, matchers must
//! compile, and the registry URL must parse.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use lethe_core::{ExceptionRule, RetentionRule, RuleSet};
use lethe_registry::{RegistryAuth, RegistryConfig};

/// Top-level configuration file schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    /// Compute and report deletions without performing them.
    #[serde(default)]
    pub dry_run: bool,

    /// Registry endpoint and credentials.
    pub docker_registry: DockerRegistryConfig,

    /// Retention rules.
    #[serde(default)]
    pub retention_policy: RetentionPolicyConfig,
}

/// Registry connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DockerRegistryConfig {
    /// Registry URL.
    #[serde(rename = "URL")]
    pub url: String,

    /// Username for basic authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication.
    #[serde(default)]
    pub password: Option<String>,

    /// Skip TLS certificate verification (self-signed registries).
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Retention policy section: one default rule plus ordered exceptions.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RetentionPolicyConfig {
    /// The rule applied when no exception matches.
    #[serde(default)]
    pub default: DefaultRuleConfig,

    /// Exception rules, evaluated in order; first match wins.
    #[serde(default)]
    pub exceptions: Vec<ExceptionRuleConfig>,
}

/// Default retention rule settings.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultRuleConfig {
    /// Number of most-recent tags to keep (0 disables the criterion).
    #[serde(default = "default_tags_to_keep")]
    pub tags_to_keep: usize,

    /// Age in days within which tags are kept (0 disables the criterion).
    #[serde(default)]
    pub days_to_keep: u32,

    /// Whether "latest" is always kept.
    #[serde(default = "default_keep_latest")]
    pub keep_latest: bool,
}

impl Default for DefaultRuleConfig {
    fn default() -> Self {
        Self {
            tags_to_keep: default_tags_to_keep(),
            days_to_keep: 0,
            keep_latest: default_keep_latest(),
        }
    }
}

/// An exception rule scoped by image name (and optionally tag name).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExceptionRuleConfig {
    /// Regex matched (unanchored) against image names.
    pub name_matcher: String,

    /// Regex matched against tag names; non-matching tags are excluded from
    /// evaluation. Defaults to matching every tag.
    #[serde(default)]
    pub tag_matcher: Option<String>,

    /// Number of most-recent tags to keep.
    #[serde(default)]
    pub tags_to_keep: usize,

    /// Age in days within which tags are kept.
    #[serde(default)]
    pub days_to_keep: u32,

    /// Whether "latest" is always kept.
    #[serde(default)]
    pub keep_latest: bool,
}

const fn default_tags_to_keep() -> usize {
    10
}

const fn default_keep_latest() -> bool {
    true
}

const fn default_timeout_seconds() -> u64 {
    30
}

impl Config {
    /// Loads and fully validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a retention
    /// rule is vacuous, a matcher fails to compile, or the registry URL is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config failed: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("unmarshal config failed: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every part of the configuration without building anything.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate(&self) -> Result<()> {
        self.rule_set()?;
        self.registry_config()?;
        Ok(())
    }

    /// Builds the validated, compiled rule set.
    ///
    /// # Errors
    ///
    /// Returns an error for vacuous rules or matchers that fail to compile.
    pub fn rule_set(&self) -> Result<RuleSet> {
        let policy = &self.retention_policy;
        let default_rule = RetentionRule::new(
            policy.default.tags_to_keep,
            policy.default.days_to_keep,
            policy.default.keep_latest,
        );

        let exceptions = policy
            .exceptions
            .iter()
            .map(|e| {
                ExceptionRule::compile(
                    &e.name_matcher,
                    e.tag_matcher.as_deref(),
                    RetentionRule::new(e.tags_to_keep, e.days_to_keep, e.keep_latest),
                )
            })
            .collect::<lethe_core::Result<Vec<_>>>()?;

        Ok(RuleSet::new(default_rule, exceptions)?)
    }

    /// Builds the registry client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse.
    pub fn registry_config(&self) -> Result<RegistryConfig> {
        let registry = &self.docker_registry;
        url::Url::parse(&registry.url)
            .with_context(|| format!("invalid registry URL: {}", registry.url))?;

        let mut config = RegistryConfig::new(&registry.url)
            .with_timeout(Duration::from_secs(registry.timeout_seconds));
        if let (Some(username), Some(password)) = (&registry.username, &registry.password) {
            config = config.with_auth(RegistryAuth::basic(username, password));
        }
        if registry.insecure {
            config = config.insecure();
        }
        Ok(config)
    }
}
