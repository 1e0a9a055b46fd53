//! # Creeble Rust Client
//!
//! Client library for the Creeble content API: paginated, filterable
//! collection reads and structured form submission, resilient to transient
//! network and server failures.
//!
//! ## Features
//!
//! - **Resilient reads**: every idempotent request runs under a retry
//!   policy with exponential backoff and jitter
//! - **Complete collections**: three traversal strategies (sequential,
//!   concurrent-batched, auto-selecting) turn a paged endpoint into one
//!   ordered collection
//! - **Classified errors**: one tagged error type distinguishes auth,
//!   validation, rate-limit, server, and transport failures
//! - **Forms**: schema-driven local validation before submission;
//!   submissions are never retried
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use creeble::{CollectOptions, Creeble, Query, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Creeble::new("napi_your_api_key")?;
//!
//!     // One page
//!     let page = client.data.paginate("my-project", 1, 25, Query::new()).await?;
//!
//!     // The whole collection, strategy chosen automatically
//!     let items = client
//!         .data
//!         .collect_all(
//!             "my-project",
//!             &Query::new().filter("type", "rows"),
//!             &CollectOptions::new().with_max_items(500),
//!         )
//!         .await?;
//!
//!     println!("{} of {} items", page.items().len(), items.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Creeble (client)
//!   └─ Data / Projects / Forms        caller-facing facades
//!        └─ PaginationEngine          sequential | concurrent | auto
//!             └─ PageFetcher          one page per call
//!                  └─ RetryPolicy     backoff + jitter, transient-only
//!                       └─ Transport  one bounded exchange, classified errors
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error taxonomy
pub mod error;

/// Wire-level types: envelopes, pagination metadata, queries
pub mod types;

/// Typed accessors over opaque records
pub mod model;

/// HTTP transport with error classification
pub mod http;

/// Retry policy with exponential backoff and jitter
pub mod retry;

/// Page fetcher and traversal strategies
pub mod pagination;

/// Endpoint facades: data, projects, forms
pub mod endpoints;

/// Top-level client
pub mod client;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::{Creeble, Endpoint};
pub use endpoints::{Data, FindKind, Forms, Projects, ValidationOutcome};
pub use error::{Error, Result};
pub use http::{Transport, TransportConfig};
pub use model::DataItem;
pub use pagination::{CollectOptions, PageFetcher, PageSource, PaginationEngine, Strategy};
pub use retry::RetryPolicy;
pub use types::{Item, PageEnvelope, PaginationMeta, Query, SortDirection};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
