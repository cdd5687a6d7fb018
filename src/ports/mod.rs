//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the verification core and an
//! external system (time, shell commands, HTTP). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod http;
pub mod shell;

pub use clock::Clock;
pub use http::{HttpClient, HttpFuture, HttpRequest, HttpResponse};
pub use shell::{CommandExecutor, ShellFuture, ShellOutput};
