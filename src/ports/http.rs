//! HTTP client port for issuing test requests.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::error::HttpError;

/// Boxed future type alias used by [`HttpClient`] to keep the trait dyn-compatible.
pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// A single request against the service under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Absolute URL.
    pub url: String,
    /// Bound on the whole exchange, body included.
    pub timeout: Duration,
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

/// Sends HTTP requests.
pub trait HttpClient: Send + Sync {
    /// Issues one request. No retries.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::RequestTimeout`] when the timeout elapses and
    /// [`HttpError::RequestFailed`] for any other transport failure.
    fn send(&self, request: &HttpRequest) -> HttpFuture<'_>;
}
