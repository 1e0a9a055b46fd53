//! HTTP transport module
//!
//! One bounded request/response exchange against the Creeble API: URL
//! building, the API key header, a per-call deadline, and classification of
//! failures into the error taxonomy. Retries live in [`crate::retry`], not
//! here, so non-idempotent calls are never silently re-sent.

mod transport;

pub use transport::{
    RequestInterceptor, RequestParts, ResponseInterceptor, Transport, TransportConfig,
    TransportConfigBuilder, DEFAULT_BASE_URL,
};

#[cfg(test)]
mod tests;
