//! Traversal strategies over a page source
//!
//! All three strategies share one contract: collect every item of a
//! resource, in server order, or fail with a classified error. Partial
//! results never surface.

use super::types::{CollectOptions, PageSource, Strategy};
use crate::error::{Error, Result};
use crate::types::{Item, Query};
use futures::future::join_all;
use tracing::{debug, warn};

/// Composes a [`PageSource`] into complete-collection traversals
///
/// Holds the accumulating item sequence only for the lifetime of one
/// `collect_all` call; ownership passes to the caller on return.
///
/// An in-progress traversal cannot be aborted from outside; callers that
/// need cancellation should drop the future driving it.
#[derive(Debug)]
pub struct PaginationEngine<S> {
    source: S,
}

impl<S: PageSource> PaginationEngine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Collect the entire collection using the configured strategy
    pub async fn collect_all(
        &self,
        resource: &str,
        query: &Query,
        options: &CollectOptions,
    ) -> Result<Vec<Item>> {
        let page_size = options.effective_page_size();
        match options.strategy {
            Strategy::Sequential => self.collect_sequential(resource, query, page_size).await,
            Strategy::Concurrent => {
                self.collect_concurrent(resource, query, page_size, options.effective_concurrency())
                    .await
            }
            Strategy::Auto => self.collect_auto(resource, query, options).await,
        }
    }

    /// Page-by-page traversal; the baseline every other strategy defers to
    ///
    /// With pagination metadata present, advances to the server's
    /// `next_page` (not blindly `current + 1`) and stops when
    /// `has_more_pages` is false. Without metadata, stops after the first
    /// short page.
    async fn collect_sequential(
        &self,
        resource: &str,
        query: &Query,
        page_size: u32,
    ) -> Result<Vec<Item>> {
        debug!(resource, page_size, "sequential traversal");

        let mut items = Vec::new();
        let mut page = 1u32;
        loop {
            let envelope = self
                .source
                .fetch_page(resource, page, page_size, query)
                .await?;
            let fetched = envelope.items().len();
            let pagination = envelope.pagination.clone();
            items.extend(envelope.into_items());

            match pagination {
                Some(meta) => {
                    if !meta.has_more_pages {
                        break;
                    }
                    page = meta.next_page.unwrap_or(meta.current_page + 1);
                }
                None => {
                    // Legacy response without a pagination block: a full
                    // page implies more data might follow
                    if (fetched as u32) < page_size {
                        break;
                    }
                    page += 1;
                }
            }
        }

        Ok(items)
    }

    /// Batched parallel traversal for large known-size collections
    ///
    /// Page 1 discovers `last_page`; the remaining pages are fetched in
    /// batches of `concurrency` (aligned so page 1 occupies a slot of the
    /// first batch). Batch results merge in page-number order only after
    /// the whole batch resolves. Any failure abandons the concurrent
    /// attempt and restarts from page 1 sequentially.
    async fn collect_concurrent(
        &self,
        resource: &str,
        query: &Query,
        page_size: u32,
        concurrency: u32,
    ) -> Result<Vec<Item>> {
        debug!(resource, page_size, concurrency, "concurrent traversal");

        let first = self.source.fetch_page(resource, 1, page_size, query).await?;
        let Some(meta) = first.pagination.clone() else {
            return Ok(first.into_items());
        };
        if !meta.has_more_pages {
            return Ok(first.into_items());
        }

        let mut items = first.into_items();
        let all_pages: Vec<u32> = (1..=meta.last_page).collect();

        for chunk in all_pages.chunks(concurrency as usize) {
            let batch: Vec<u32> = chunk.iter().copied().filter(|&p| p != 1).collect();
            if batch.is_empty() {
                continue;
            }

            // join_all preserves issue order, so batch-local order is
            // page-number ascending even when responses race
            let fetches = batch
                .iter()
                .map(|&page| self.source.fetch_page(resource, page, page_size, query));
            let results = join_all(fetches).await;

            let mut batch_items = Vec::new();
            let mut failure = None;
            for result in results {
                match result {
                    Ok(envelope) => batch_items.extend(envelope.into_items()),
                    Err(error) => failure = Some(error),
                }
            }

            if let Some(error) = failure {
                // No partial-results guarantee in concurrent mode; start
                // over with the strategy that has one
                warn!(
                    resource,
                    error = %error,
                    "concurrent traversal failed, restarting sequentially"
                );
                return self.collect_sequential(resource, query, page_size).await;
            }

            items.extend(batch_items);
        }

        Ok(items)
    }

    /// Probe the collection, guard against oversize, then choose a strategy
    ///
    /// Small collections (three pages or fewer) and callers that declined
    /// concurrency take the sequential path; everything else goes
    /// concurrent.
    async fn collect_auto(
        &self,
        resource: &str,
        query: &Query,
        options: &CollectOptions,
    ) -> Result<Vec<Item>> {
        let probe_query = query.clone().fields(["id"]);
        let probe = self.source.fetch_page(resource, 1, 1, &probe_query).await?;

        let page_size = options.effective_page_size();
        let Some(meta) = probe.pagination else {
            debug!(resource, "probe response unpaginated, using sequential");
            return self.collect_sequential(resource, query, page_size).await;
        };

        if let Some(max_items) = options.max_items {
            if meta.total > max_items {
                return Err(Error::CollectionTooLarge {
                    total: meta.total,
                    max_items,
                });
            }
        }

        let last_page = meta.total.div_ceil(u64::from(page_size)).max(1) as u32;
        let concurrency = options.effective_concurrency();

        if last_page <= 3 || concurrency <= 1 {
            self.collect_sequential(resource, query, page_size).await
        } else {
            self.collect_concurrent(resource, query, page_size, concurrency)
                .await
        }
    }
}
