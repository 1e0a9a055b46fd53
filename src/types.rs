//! Wire-level types shared across the client
//!
//! The page envelope and pagination metadata mirror the API's response shape.
//! Items stay opaque JSON values; consumers that want typed access wrap them
//! in [`crate::model::DataItem`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An opaque record returned by the API, identified by its `id` field
pub type Item = serde_json::Value;

// ============================================================================
// Pagination metadata
// ============================================================================

/// Pagination block attached to paged responses
///
/// Invariants maintained by the server (and relied on by the pagination
/// engine): `has_more_pages == (current_page < last_page)`, `next_page` is
/// present iff `has_more_pages`, and `is_last_page == !has_more_pages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
    /// Some deployments still emit this as `total_pages`
    #[serde(alias = "total_pages")]
    pub last_page: u32,
    pub has_more_pages: bool,
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(default)]
    pub prev_page: Option<u32>,
    #[serde(default)]
    pub is_last_page: bool,
}

// ============================================================================
// Response envelope
// ============================================================================

/// Top-level `data` payload: a single record or an ordered sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Many(Vec<Item>),
    One(Item),
}

impl ResponseData {
    /// Number of items carried
    pub fn len(&self) -> usize {
        match self {
            ResponseData::Many(items) => items.len(),
            ResponseData::One(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ResponseData::Many(items) => items.is_empty(),
            ResponseData::One(_) => false,
        }
    }
}

/// Request metadata echoed back by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Resource the response was served from; lets a caller resume pagination
    /// from an envelope without re-supplying the resource name
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
}

/// One server response: items plus optional pagination metadata
///
/// A missing `pagination` block signals a legacy, non-paginated response; the
/// pagination engine then falls back to the full-page heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEnvelope {
    pub data: ResponseData,
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
}

impl PageEnvelope {
    /// Items in this envelope, normalized to a slice
    pub fn items(&self) -> &[Item] {
        match &self.data {
            ResponseData::Many(items) => items.as_slice(),
            ResponseData::One(item) => std::slice::from_ref(item),
        }
    }

    /// Take ownership of the items
    pub fn into_items(self) -> Vec<Item> {
        match self.data {
            ResponseData::Many(items) => items,
            ResponseData::One(item) => vec![item],
        }
    }

    /// True when the server reports further pages after this one
    pub fn has_more_pages(&self) -> bool {
        self.pagination
            .as_ref()
            .is_some_and(|p| p.has_more_pages)
    }

    /// True when this is the final page (or the response is unpaginated)
    pub fn is_last_page(&self) -> bool {
        !self.has_more_pages()
    }
}

// ============================================================================
// Query
// ============================================================================

/// Sort direction for ordered listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// An immutable description of one collection query
///
/// Built by the facade from caller arguments and rendered into wire
/// parameters by [`Query::to_params`]. Filter values may be JSON arrays,
/// which render as repeated `key[]` parameters.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: BTreeMap<String, serde_json::Value>,
    pub search: Option<String>,
    pub sort: Option<(String, SortDirection)>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub fields: Option<Vec<String>>,
    pub find_by: Option<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter on `field`
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Set a full-text search term
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Sort by `field` in `direction`
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some((field.into(), direction));
        self
    }

    /// Request a specific page
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Request a page size
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restrict the response to the named fields (payload-size reduction)
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Ask the server for the first record where `field == value`
    #[must_use]
    pub fn find_by(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.find_by = Some((field.into(), value.into()));
        self
    }

    /// Render the query into wire parameters
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        for (key, value) in &self.filters {
            match value {
                serde_json::Value::Array(values) => {
                    for v in values {
                        params.push((format!("{key}[]"), scalar_to_string(v)));
                    }
                }
                serde_json::Value::Null => {}
                v => params.push((key.clone(), scalar_to_string(v))),
            }
        }

        if let Some(term) = &self.search {
            params.push(("search".to_string(), term.clone()));
        }
        if let Some((field, direction)) = &self.sort {
            params.push(("sort".to_string(), field.clone()));
            params.push(("order".to_string(), direction.as_str().to_string()));
        }
        if let Some(fields) = &self.fields {
            params.push(("fields".to_string(), fields.join(",")));
        }
        if let Some((field, value)) = &self.find_by {
            params.push(("find_by".to_string(), format!("{field}:{value}")));
        }

        params
    }
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        v => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_query_params_wire_shape() {
        let query = Query::new()
            .page(2)
            .limit(25)
            .filter("type", "rows")
            .filter("database", "Posts")
            .sort("created_at", SortDirection::Desc)
            .fields(["id", "title"])
            .find_by("slug", "about");

        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "25".to_string()),
                ("database".to_string(), "Posts".to_string()),
                ("type".to_string(), "rows".to_string()),
                ("sort".to_string(), "created_at".to_string()),
                ("order".to_string(), "desc".to_string()),
                ("fields".to_string(), "id,title".to_string()),
                ("find_by".to_string(), "slug:about".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_array_filter_renders_repeated_params() {
        let query = Query::new().filter("tags", json!(["rust", "async"]));
        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("tags[]".to_string(), "rust".to_string()),
                ("tags[]".to_string(), "async".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_null_filter_dropped() {
        let query = Query::new().filter("missing", serde_json::Value::Null);
        assert!(query.to_params().is_empty());
    }

    #[test]
    fn test_envelope_items_normalization() {
        let envelope: PageEnvelope = serde_json::from_value(json!({
            "data": [{"id": "a"}, {"id": "b"}],
            "pagination": {
                "current_page": 1,
                "per_page": 25,
                "total": 2,
                "last_page": 1,
                "has_more_pages": false,
                "is_last_page": true
            }
        }))
        .unwrap();

        assert_eq!(envelope.items().len(), 2);
        assert!(envelope.is_last_page());
        assert!(!envelope.has_more_pages());
    }

    #[test]
    fn test_envelope_singleton_data() {
        let envelope: PageEnvelope =
            serde_json::from_value(json!({ "data": {"id": "only"} })).unwrap();
        assert_eq!(envelope.items().len(), 1);
        assert_eq!(envelope.into_items()[0]["id"], "only");
    }

    #[test]
    fn test_envelope_without_pagination_is_last_page() {
        let envelope: PageEnvelope =
            serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(envelope.pagination.is_none());
        assert!(envelope.is_last_page());
    }

    #[test]
    fn test_pagination_meta_total_pages_alias() {
        let meta: PaginationMeta = serde_json::from_value(json!({
            "current_page": 1,
            "per_page": 20,
            "total": 100,
            "total_pages": 5,
            "has_more_pages": true,
            "next_page": 2
        }))
        .unwrap();
        assert_eq!(meta.last_page, 5);
        assert_eq!(meta.next_page, Some(2));
        assert!(!meta.is_last_page);
    }
}
