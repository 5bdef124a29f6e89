//! HTTP server implementation for commodo.
//!
//! A small tokio server: one task per connection, one request per
//! connection, every request answered by [`FileServerHandler`].

mod response;
mod config;
mod error;
mod handler;
mod http_server;

// Re-export public items
pub use response::{Body, HttpResponse, StatusCode};
pub use config::{ServerConfig, DEFAULT_PORT, DEFAULT_READ_BUFFER_SIZE, MAX_HEAD_SIZE};
pub use error::Error;
pub use handler::FileServerHandler;
pub use http_server::HttpServer;
