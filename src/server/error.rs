//! Error types for the HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::Error as ParserError;

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error, including failures while streaming a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The configured root is missing or not a directory.
    #[error("Invalid path `{}`: {source}", path.display())]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The listen address could not be bound.
    #[error("Failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

impl From<crate::files::Error> for Error {
    fn from(err: crate::files::Error) -> Self {
        match err {
            crate::files::Error::NotFound { path, .. } => Error::NotFound(path),
        }
    }
}
