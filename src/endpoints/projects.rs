//! Projects endpoint: project metadata and schema

use crate::error::Result;
use crate::http::Transport;
use crate::retry::RetryPolicy;
use serde_json::Value;
use std::sync::Arc;

/// Access to project-level information
pub struct Projects {
    transport: Arc<Transport>,
    retry: RetryPolicy,
}

impl Projects {
    pub fn new(transport: Arc<Transport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    /// Project information for an endpoint
    pub async fn info(&self, resource: &str) -> Result<Value> {
        self.get_value("project info", &format!("/v1/{resource}/info"))
            .await
    }

    /// Project schema/structure
    pub async fn schema(&self, resource: &str) -> Result<Value> {
        self.get_value("project schema", &format!("/v1/{resource}/schema"))
            .await
    }

    /// Project statistics
    pub async fn stats(&self, resource: &str) -> Result<Value> {
        self.get_value("project stats", &format!("/v1/{resource}/stats"))
            .await
    }

    /// The fields declared in the project schema
    pub async fn fields(&self, resource: &str) -> Result<Vec<Value>> {
        let schema = self.schema(resource).await?;
        Ok(schema
            .get("fields")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// Whether the project endpoint exists and is accessible
    ///
    /// Same discipline as [`crate::endpoints::Data::exists`]: only a
    /// not-found reads as `false`, every other failure propagates.
    pub async fn exists(&self, resource: &str) -> Result<bool> {
        match self.info(resource).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn get_value(&self, context: &str, path: &str) -> Result<Value> {
        self.retry
            .execute(context, || {
                let transport = Arc::clone(&self.transport);
                let path = path.to_string();
                async move { transport.get(&path, &[]).await }
            })
            .await
    }
}

impl std::fmt::Debug for Projects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projects").finish_non_exhaustive()
    }
}
