//! Error types for resolving request paths against the served tree.

use thiserror::Error;

/// Errors that can occur while resolving a request path.
#[derive(Debug, Error)]
pub enum Error {
    /// The path could not be opened or stat'ed. The source is kept for logs
    /// and never shown to clients.
    #[error("Not found: {path}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
