//! Data endpoint: fetching content from project endpoints

use crate::error::{Error, Result};
use crate::http::Transport;
use crate::model::DataItem;
use crate::pagination::{CollectOptions, PageFetcher, PaginationEngine};
use crate::retry::RetryPolicy;
use crate::types::{Item, PageEnvelope, Query, ResponseData, SortDirection};
use serde_json::Value;
use std::sync::Arc;

/// Which record kind a find-by lookup targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FindKind {
    #[default]
    Pages,
    Rows,
}

impl FindKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FindKind::Pages => "pages",
            FindKind::Rows => "rows",
        }
    }
}

/// Read access to a project's content
pub struct Data {
    transport: Arc<Transport>,
    retry: RetryPolicy,
    engine: PaginationEngine<PageFetcher>,
}

impl Data {
    pub fn new(transport: Arc<Transport>, retry: RetryPolicy) -> Self {
        let fetcher = PageFetcher::with_retry(Arc::clone(&transport), retry.clone());
        Self {
            transport,
            retry,
            engine: PaginationEngine::new(fetcher),
        }
    }

    /// List items from a project endpoint
    pub async fn list(&self, resource: &str, query: &Query) -> Result<PageEnvelope> {
        let path = format!("/v1/{resource}");
        let value = self.get_value("list", &path, &query.to_params()).await?;
        parse_envelope(value)
    }

    /// Get one item by id
    pub async fn get(&self, resource: &str, id: &str) -> Result<PageEnvelope> {
        let path = format!("/v1/{resource}/{id}");
        let value = self.get_value("get", &path, &[]).await?;
        parse_envelope(value)
    }

    /// Search items by a full-text term, with optional extra filters
    pub async fn search(&self, resource: &str, term: &str, query: Query) -> Result<PageEnvelope> {
        self.list(resource, &query.search(term)).await
    }

    /// Fetch one specific page
    pub async fn paginate(
        &self,
        resource: &str,
        page: u32,
        limit: u32,
        query: Query,
    ) -> Result<PageEnvelope> {
        self.list(resource, &query.page(page).limit(limit)).await
    }

    /// Filter items by field values
    pub async fn filter(&self, resource: &str, query: Query) -> Result<PageEnvelope> {
        self.list(resource, &query).await
    }

    /// Sort items by a field
    pub async fn sort_by(
        &self,
        resource: &str,
        field: &str,
        direction: SortDirection,
        query: Query,
    ) -> Result<PageEnvelope> {
        self.list(resource, &query.sort(field, direction)).await
    }

    /// The most recently created items
    pub async fn recent(&self, resource: &str, limit: u32) -> Result<PageEnvelope> {
        self.sort_by(
            resource,
            "created_at",
            SortDirection::Desc,
            Query::new().limit(limit),
        )
        .await
    }

    /// List with only the named fields in the payload
    pub async fn list_fields(
        &self,
        resource: &str,
        fields: impl IntoIterator<Item = impl Into<String>>,
        query: Query,
    ) -> Result<PageEnvelope> {
        self.list(resource, &query.fields(fields)).await
    }

    /// Minimal-payload listing: ids and titles only
    pub async fn list_lightweight(&self, resource: &str, query: Query) -> Result<PageEnvelope> {
        self.list_fields(resource, ["id", "title"], query).await
    }

    /// Collect the entire collection using a traversal strategy
    pub async fn collect_all(
        &self,
        resource: &str,
        query: &Query,
        options: &CollectOptions,
    ) -> Result<Vec<Item>> {
        self.engine.collect_all(resource, query, options).await
    }

    /// Fetch the page after `envelope`, resuming via its `meta.endpoint`
    ///
    /// Returns `Ok(None)` when there is no next page.
    pub async fn next_page(
        &self,
        envelope: &PageEnvelope,
        query: Query,
    ) -> Result<Option<PageEnvelope>> {
        let Some(meta) = &envelope.pagination else {
            return Ok(None);
        };
        let Some(next) = meta.next_page else {
            return Ok(None);
        };
        let resource = resume_endpoint(envelope)?;
        let next = self.paginate(&resource, next, meta.per_page, query).await?;
        Ok(Some(next))
    }

    /// Fetch the page before `envelope`; `Ok(None)` when already on page 1
    pub async fn prev_page(
        &self,
        envelope: &PageEnvelope,
        query: Query,
    ) -> Result<Option<PageEnvelope>> {
        let Some(meta) = &envelope.pagination else {
            return Ok(None);
        };
        let Some(prev) = meta.prev_page else {
            return Ok(None);
        };
        let resource = resume_endpoint(envelope)?;
        let prev = self.paginate(&resource, prev, meta.per_page, query).await?;
        Ok(Some(prev))
    }

    /// Find the first record where `field == value`
    ///
    /// Issues exactly one filtered request and never scans subsequent
    /// pages: a singleton response is the item, a sequence yields its first
    /// element, an empty response is `None`.
    pub async fn find_by(
        &self,
        resource: &str,
        field: &str,
        value: &str,
        kind: FindKind,
    ) -> Result<Option<DataItem>> {
        let query = Query::new()
            .find_by(field, value)
            .filter("type", kind.as_str());
        let envelope = self.list(resource, &query).await?;
        Ok(match envelope.data {
            ResponseData::One(item) => Some(DataItem::new(item)),
            ResponseData::Many(items) => items.into_iter().next().map(DataItem::new),
        })
    }

    /// Find a page record by field value
    pub async fn find_page_by(
        &self,
        resource: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<DataItem>> {
        self.find_by(resource, field, value, FindKind::Pages).await
    }

    /// Find a database row by field value
    pub async fn find_row_by(
        &self,
        resource: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<DataItem>> {
        self.find_by(resource, field, value, FindKind::Rows).await
    }

    /// Whether an item with this id exists
    ///
    /// Only a not-found response reads as `false`; auth failures, outages
    /// and everything else propagate, so an outage is never mistaken for
    /// non-existence.
    pub async fn exists(&self, resource: &str, id: &str) -> Result<bool> {
        match self.get(resource, id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Retry-wrapped GET returning the raw body
    async fn get_value(
        &self,
        context: &str,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value> {
        self.retry
            .execute(context, || {
                let transport = Arc::clone(&self.transport);
                let path = path.to_string();
                let params = params.to_vec();
                async move { transport.get(&path, &params).await }
            })
            .await
    }
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data").finish_non_exhaustive()
    }
}

fn parse_envelope(value: Value) -> Result<PageEnvelope> {
    Ok(serde_json::from_value(value)?)
}

fn resume_endpoint(envelope: &PageEnvelope) -> Result<String> {
    envelope
        .meta
        .as_ref()
        .and_then(|meta| meta.endpoint.clone())
        .ok_or_else(|| Error::decode("envelope has no meta.endpoint to resume pagination from"))
}
