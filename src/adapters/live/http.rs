//! Live HTTP client backed by `reqwest`.

use std::time::Duration;

use reqwest::{Client, Method};

use crate::error::HttpError;
use crate::ports::http::{HttpClient, HttpFuture, HttpRequest, HttpResponse};

/// HTTP client used against the service under test.
pub struct LiveHttpClient {
    client: Client,
}

impl LiveHttpClient {
    /// Builds the underlying client.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error when the client cannot be initialised
    /// (for example, no usable TLS backend).
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self { client: Client::builder().build()? })
    }
}

fn classify(error: &reqwest::Error, timeout: Duration) -> HttpError {
    if error.is_timeout() {
        HttpError::RequestTimeout(timeout)
    } else {
        HttpError::RequestFailed(error.to_string())
    }
}

impl HttpClient for LiveHttpClient {
    fn send(&self, request: &HttpRequest) -> HttpFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
                HttpError::RequestFailed(format!("invalid method `{}`: {e}", request.method))
            })?;

            let response = self
                .client
                .request(method, &request.url)
                .timeout(request.timeout)
                .send()
                .await
                .map_err(|e| classify(&e, request.timeout))?;

            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| classify(&e, request.timeout))?;

            Ok(HttpResponse { status, body })
        })
    }
}
