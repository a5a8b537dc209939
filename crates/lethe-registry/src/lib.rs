//! # Lethe Registry
//!
//! Docker Registry HTTP API v2 client for the Lethe registry cleaner.
//!
//! This crate provides the HTTP implementation of
//! [`lethe_core::RegistryBackend`]: catalog and tag listing, manifest and
//! config-blob lookups (for creation timestamps and content digests), and
//! manifest deletion by digest.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lethe_registry::{RegistryClient, RegistryConfig, RegistryAuth};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RegistryConfig::new("https://registry.example.com")
//!         .with_auth(RegistryAuth::basic("ci", "secret"));
//!     let client = RegistryClient::new(config)?;
//!
//!     for repository in client.list_repositories().await? {
//!         println!("{repository}");
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod error;
pub mod wire;

pub use client::RegistryClient;
pub use config::{RegistryAuth, RegistryConfig};
pub use error::RegistryError;
