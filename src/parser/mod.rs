//! HTTP parser module.
//!
//! Parses the head of an HTTP/1.x request: request line and header section.
//! Request bodies are never read; the file server has no use for them.

mod request;
mod method;
mod version;
mod error;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;

// Re-export the parse_request function
pub use request::parse_request;
