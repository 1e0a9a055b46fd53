//! Page fetcher: one bounded page request through the transport

use super::types::PageSource;
use crate::error::Result;
use crate::http::Transport;
use crate::retry::RetryPolicy;
use crate::types::{PageEnvelope, Query};
use async_trait::async_trait;
use std::sync::Arc;

/// Fetches single pages of a resource, optionally under a retry policy
///
/// Wrapping in retries is decided here, at construction, by the caller;
/// the fetcher never retries implicitly, so call sites that must not
/// re-send (submissions) simply build one without a policy.
pub struct PageFetcher {
    transport: Arc<Transport>,
    retry: Option<RetryPolicy>,
}

impl PageFetcher {
    /// A fetcher that issues each request exactly once
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            retry: None,
        }
    }

    /// A fetcher whose requests are wrapped by `policy`
    pub fn with_retry(transport: Arc<Transport>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            retry: Some(policy),
        }
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch_page(
        &self,
        resource: &str,
        page: u32,
        page_size: u32,
        query: &Query,
    ) -> Result<PageEnvelope> {
        let path = format!("/v1/{resource}");
        let params = query.clone().page(page).limit(page_size).to_params();

        let value = match &self.retry {
            Some(policy) => {
                let context = format!("fetch {resource} page {page}");
                policy
                    .execute(&context, || {
                        let transport = Arc::clone(&self.transport);
                        let path = path.clone();
                        let params = params.clone();
                        async move { transport.get(&path, &params).await }
                    })
                    .await?
            }
            None => self.transport.get(&path, &params).await?,
        };

        let envelope: PageEnvelope = serde_json::from_value(value)?;
        Ok(envelope)
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("transport", &self.transport)
            .field("has_retry", &self.retry.is_some())
            .finish()
    }
}
