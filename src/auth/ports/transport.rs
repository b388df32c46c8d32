//! Transport port for outbound API requests.

use crate::auth::domain::{AccessToken, ApiRequest, ApiResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Issues a single HTTP request against the backend API.
///
/// The transport owns the base URL, cookie jar (which carries the refresh
/// token), and header mechanics: JSON bodies get `Content-Type`/`Accept`
/// headers, multipart bodies have their content type and boundary generated
/// by the transport, and the bearer token is attached only when the caller
/// supplies one.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes the request, returning the status and parsed body.
    ///
    /// Any HTTP status is a successful execution; only connection-level
    /// failures surface as errors.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request cannot be delivered or
    /// the response cannot be read.
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&AccessToken>,
    ) -> TransportResult<ApiResponse>;
}

/// Errors returned by transport implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request never reached the backend or the connection dropped.
    #[error("network failure: {0}")]
    Network(String),

    /// The request descriptor could not be converted into a wire request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
