//! Adapter kind classification.

use serde::{Deserialize, Serialize};

/// Which lifecycle drives the artifact under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// A command-line tool; tests run commands.
    Cli,
    /// A web application served over HTTP.
    Webapp,
    /// An API-only service. Same lifecycle as [`AdapterKind::Webapp`].
    Api,
}

impl AdapterKind {
    /// The identifier used in the spec file and the report.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Webapp => "webapp",
            Self::Api => "api",
        }
    }

    /// Returns `true` for kinds that launch a long-running process.
    #[must_use]
    pub fn is_service(self) -> bool {
        matches!(self, Self::Webapp | Self::Api)
    }
}

impl std::fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
