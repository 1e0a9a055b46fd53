//! Main Creeble API client

use crate::endpoints::{Data, FindKind, Forms, Projects};
use crate::error::Result;
use crate::http::{Transport, TransportConfig};
use crate::model::DataItem;
use crate::pagination::CollectOptions;
use crate::retry::RetryPolicy;
use crate::types::{Item, PageEnvelope, Query, SortDirection};
use serde_json::Value;
use std::sync::Arc;

/// Main Creeble API client
///
/// Owns the shared transport and exposes the endpoint facades. The retry
/// policy is injected at construction and wraps idempotent reads only.
///
/// ```rust,no_run
/// use creeble::{CollectOptions, Creeble, Query};
///
/// #[tokio::main]
/// async fn main() -> creeble::Result<()> {
///     let client = Creeble::new("napi_your_api_key")?;
///
///     let posts = client.endpoint("my-project");
///     let recent = posts.recent(10).await?;
///     println!("{} recent items", recent.items().len());
///
///     let everything = posts
///         .collect_all(&Query::new(), &CollectOptions::new().with_max_items(500))
///         .await?;
///     println!("{} items total", everything.len());
///     Ok(())
/// }
/// ```
pub struct Creeble {
    transport: Arc<Transport>,
    pub data: Data,
    pub projects: Projects,
    pub forms: Forms,
}

impl Creeble {
    /// Create a client with the default configuration and retry policy
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(TransportConfig::new(api_key), RetryPolicy::default())
    }

    /// Create a client from explicit collaborators
    pub fn with_config(config: TransportConfig, retry: RetryPolicy) -> Result<Self> {
        Self::with_transport(Arc::new(Transport::new(config)?), retry)
    }

    /// Create a client around a pre-built transport
    ///
    /// Use this when the transport needs interceptors installed before the
    /// facades share it.
    pub fn with_transport(transport: Arc<Transport>, retry: RetryPolicy) -> Result<Self> {
        Ok(Self {
            data: Data::new(Arc::clone(&transport), retry.clone()),
            projects: Projects::new(Arc::clone(&transport), retry.clone()),
            forms: Forms::new(Arc::clone(&transport), retry),
            transport,
        })
    }

    /// Test the API connection
    pub async fn ping(&self) -> Result<Value> {
        self.transport.get("/ping", &[]).await
    }

    /// API version information
    pub async fn version(&self) -> Result<Value> {
        self.transport.get("/version", &[]).await
    }

    /// The underlying transport
    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// A helper scoped to one project endpoint
    pub fn endpoint(&self, name: impl Into<String>) -> Endpoint<'_> {
        Endpoint {
            name: name.into(),
            data: &self.data,
        }
    }
}

impl std::fmt::Debug for Creeble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creeble")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Data operations bound to one project endpoint
#[derive(Debug)]
pub struct Endpoint<'a> {
    name: String,
    data: &'a Data,
}

impl Endpoint<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn list(&self, query: &Query) -> Result<PageEnvelope> {
        self.data.list(&self.name, query).await
    }

    pub async fn get(&self, id: &str) -> Result<PageEnvelope> {
        self.data.get(&self.name, id).await
    }

    pub async fn search(&self, term: &str, query: Query) -> Result<PageEnvelope> {
        self.data.search(&self.name, term, query).await
    }

    pub async fn paginate(&self, page: u32, limit: u32, query: Query) -> Result<PageEnvelope> {
        self.data.paginate(&self.name, page, limit, query).await
    }

    pub async fn filter(&self, query: Query) -> Result<PageEnvelope> {
        self.data.filter(&self.name, query).await
    }

    pub async fn sort_by(
        &self,
        field: &str,
        direction: SortDirection,
        query: Query,
    ) -> Result<PageEnvelope> {
        self.data.sort_by(&self.name, field, direction, query).await
    }

    pub async fn recent(&self, limit: u32) -> Result<PageEnvelope> {
        self.data.recent(&self.name, limit).await
    }

    pub async fn collect_all(
        &self,
        query: &Query,
        options: &CollectOptions,
    ) -> Result<Vec<Item>> {
        self.data.collect_all(&self.name, query, options).await
    }

    pub async fn find_by(
        &self,
        field: &str,
        value: &str,
        kind: FindKind,
    ) -> Result<Option<DataItem>> {
        self.data.find_by(&self.name, field, value, kind).await
    }

    pub async fn find_page_by(&self, field: &str, value: &str) -> Result<Option<DataItem>> {
        self.data.find_page_by(&self.name, field, value).await
    }

    pub async fn find_row_by(&self, field: &str, value: &str) -> Result<Option<DataItem>> {
        self.data.find_row_by(&self.name, field, value).await
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        self.data.exists(&self.name, id).await
    }
}
