//! Pagination options and the page source seam

use crate::error::Result;
use crate::types::{PageEnvelope, Query};
use async_trait::async_trait;

/// Server-side maximum page size; larger requests are clamped by the API
pub const MAX_PAGE_SIZE: u32 = 25;

/// Default number of in-flight requests per concurrent batch
pub const DEFAULT_CONCURRENCY: u32 = 3;

/// Anything that can produce one page of a paged resource
///
/// The engine only depends on this trait, so traversals can be tested
/// against synthetic in-memory resources.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page (`page >= 1`, `page_size >= 1`) of `resource`
    async fn fetch_page(
        &self,
        resource: &str,
        page: u32,
        page_size: u32,
        query: &Query,
    ) -> Result<PageEnvelope>;
}

/// Traversal strategy for [`super::PaginationEngine::collect_all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Page-by-page, in order; always correct
    Sequential,
    /// Batched parallel fetches; falls back to Sequential on failure
    Concurrent,
    /// Probe the collection size, then choose
    #[default]
    Auto,
}

/// Options for one traversal
#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub strategy: Strategy,
    /// In-flight requests per batch (>= 1)
    pub concurrency: u32,
    /// Requested page size (>= 1, clamped to [`MAX_PAGE_SIZE`])
    pub page_size: u32,
    /// Safety cap; Auto fails fast when the reported total exceeds it
    pub max_items: Option<u64>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Auto,
            concurrency: DEFAULT_CONCURRENCY,
            page_size: MAX_PAGE_SIZE,
            max_items: None,
        }
    }
}

impl CollectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the sequential strategy
    pub fn sequential() -> Self {
        Self {
            strategy: Strategy::Sequential,
            ..Self::default()
        }
    }

    /// Force the concurrent strategy
    pub fn concurrent(concurrency: u32) -> Self {
        Self {
            strategy: Strategy::Concurrent,
            concurrency,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: u32) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_max_items(mut self, max_items: u64) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Page size after clamping to the server maximum
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Concurrency after enforcing the lower bound
    pub fn effective_concurrency(&self) -> u32 {
        self.concurrency.max(1)
    }
}
