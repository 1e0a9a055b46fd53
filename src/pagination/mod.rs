//! Pagination module
//!
//! Turns a single paged endpoint into one complete, ordered collection.
//!
//! # Overview
//!
//! [`PageFetcher`] issues one "page N of size L" request through the
//! transport and normalizes the envelope. [`PaginationEngine`] composes a
//! [`PageSource`] into three traversal strategies with different
//! latency/throughput/safety trade-offs:
//!
//! - **Sequential** - the baseline, always correct; the only strategy with a
//!   total-ordering guarantee under partial failure.
//! - **Concurrent** - batched parallel fetches for large, known-bounded
//!   collections; falls back to Sequential on any batch failure.
//! - **Auto** - probes the collection size and picks one of the above, with
//!   an oversize guard so callers never accidentally pull an unbounded
//!   collection.

mod engine;
mod fetcher;
mod types;

pub use engine::PaginationEngine;
pub use fetcher::PageFetcher;
pub use types::{CollectOptions, PageSource, Strategy, DEFAULT_CONCURRENCY, MAX_PAGE_SIZE};
