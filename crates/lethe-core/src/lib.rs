//! # Lethe Core
//!
//! Retention-policy evaluation engine for the Lethe container registry
//! cleaner.
//!
//! This crate decides, per tag, whether an image tag survives a cleanup run
//! or is marked for deletion. It contains:
//!
//! - [`Image`] / [`Tag`] - a per-run snapshot of one repository's tag history
//! - [`RetentionRule`] / [`ExceptionRule`] / [`RuleSet`] - the retention
//!   configuration, validated at load time
//! - [`evaluate`] - the pure dual-criterion (count AND age) evaluator
//! - [`Engine`] - the orchestrator that scans a registry through a
//!   [`RegistryBackend`] and issues deletions
//! - [`ImageReport`] / [`Verdict`] - structured outcomes plus the stable
//!   audit-line rendering
//!
//! Registry access is behind the [`RegistryBackend`] trait; the
//! `lethe-registry` crate provides the HTTP implementation.
//!
//! ## Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use lethe_core::{evaluate, RetentionRule, Tag, Verdict};
//!
//! let now = Utc::now();
//! let tags = vec![
//!     Tag::new("v2", "sha256:b", now - Duration::days(1)),
//!     Tag::new("v1", "sha256:a", now - Duration::days(2)),
//! ];
//!
//! // Keep the single newest tag; no age criterion.
//! let verdicts = evaluate(&tags, &RetentionRule::new(1, 0, false), now);
//! assert_eq!(verdicts[0].verdict, Verdict::Retain);
//! assert_eq!(verdicts[1].verdict, Verdict::Delete);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod image;
pub mod matcher;
pub mod report;
pub mod rule;


pub use engine::{Engine, RegistryBackend, RunSummary, ScanEntry};
pub use error::{BackendError, Error, Result};
pub use evaluator::{evaluate, LATEST_TAG};
pub use image::{Image, Tag};
pub use matcher::{partition_tags, RuleSet, SelectedRule, DEFAULT_RULE_LABEL};
pub use report::{ImageReport, TagVerdict, Verdict};
pub use rule::{ExceptionRule, RetentionRule};
