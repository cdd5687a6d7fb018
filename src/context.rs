//! Service context bundling all port trait objects.

use tracing::warn;

use crate::adapters::live::clock::SystemClock;
use crate::adapters::live::http::LiveHttpClient;
use crate::adapters::live::shell::LiveCommandExecutor;
use crate::ports::clock::Clock;
use crate::ports::http::HttpClient;
use crate::ports::shell::CommandExecutor;

/// Bundles the ports a verification run talks through.
///
/// `http` doubles as the capability flag: it is resolved once when the
/// context is built, and `None` means HTTP tests cannot be executed in
/// this environment.
pub struct ServiceContext {
    /// Clock for report timestamps.
    pub clock: Box<dyn Clock>,
    /// Executor for lifecycle steps and command-mode tests.
    pub shell: Box<dyn CommandExecutor>,
    /// HTTP client for HTTP-mode tests, when one is available.
    pub http: Option<Box<dyn HttpClient>>,
}

impl ServiceContext {
    /// Creates a live context with real adapters.
    ///
    /// If the HTTP client cannot be initialised the context is still
    /// usable; HTTP tests will be reported as skipped.
    #[must_use]
    pub fn live() -> Self {
        let http: Option<Box<dyn HttpClient>> = match LiveHttpClient::new() {
            Ok(client) => Some(Box::new(client)),
            Err(e) => {
                warn!(error = %e, "HTTP client unavailable; HTTP tests will be skipped");
                None
            }
        };

        Self { clock: Box::new(SystemClock), shell: Box::new(LiveCommandExecutor), http }
    }

    /// Returns `true` when HTTP-mode tests can run.
    #[must_use]
    pub fn has_http(&self) -> bool {
        self.http.is_some()
    }
}
