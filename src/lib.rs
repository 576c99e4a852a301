// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]

//! # evalkit
//!
//! A typed client for a versioned JSON/REST AI-evaluation API: projects,
//! datasets, experiments, prompts, functions and logs.
//!
//! ## Features
//!
//! - **Typed Errors**: Every failure is an [`Error`] with a closed [`ErrorKind`]
//! - **Retries**: Exponential backoff with `Retry-After` support
//! - **Lazy Pagination**: Cursor pages pulled on demand, with optional de-duplication
//! - **Raw JSON Resources**: CRUD handles that leave typed mapping to the caller
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use evalkit::{Client, ClientConfig, ListOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::builder().api_key("sk-...").build();
//!     let client = Client::new(config)?;
//!
//!     // Eager listing
//!     let projects = client.projects().list(ListOptions::new()).await?;
//!
//!     // Lazy listing: pages are fetched only as items are pulled
//!     let mut experiments = client.experiments().stream(ListOptions::new().limit(50));
//!     while let Some(experiment) = experiments.next().await {
//!         println!("{}", experiment?["name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        Resources (project, dataset, experiment, ...)     │
//! └──────────────────────────────────────────────────────────┘
//!                  │                          │
//! ┌────────────────┴─────────┐  ┌─────────────┴──────────────┐
//! │       Pagination         │  │         HTTP Client        │
//! │ stream() / list()        │──│ execute() + retry/backoff  │
//! │ cursor, dedup, terminal  │  │ classify() → Error         │
//! └──────────────────────────┘  └────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(missing_docs)]

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP client with error classification and retry
pub mod http;

/// Cursor pagination engine
pub mod pagination;

/// Raw-JSON resource handles
pub mod resources;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ClientConfig, ConfigError};
pub use error::{Error, ErrorKind, Result};
pub use http::{Client, RequestOptions};
pub use pagination::{ListOptions, Page, PageQuery, Paginator};
pub use resources::{EventLog, Resource, ResourceKind};
pub use types::Method;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
