//! A minimal HTTP file server.
//!
//! Serves a directory tree for browsing and download: a directory URL gets
//! an HTML listing of its visible entries, a file URL streams the file's
//! bytes with a content type guessed from its extension.
//!
//! # Features
//!
//! - Request paths are cleaned lexically before touching the filesystem, so
//!   nothing above the root directory can be reached with `..`
//! - Directory URLs are canonicalized to end in `/`, file URLs to not
//! - Listings group directories before files, hide dot-files and show each
//!   entry's size, modification time and an icon for its kind
//! - Files are streamed straight from disk; `HEAD` gets headers only
//!
//! # Examples
//!
//! ```no_run
//! use commodo::{HttpServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), commodo::ServerError> {
//!     let config = ServerConfig::new("/srv/share", 4545)?;
//!     HttpServer::new(config).start().await
//! }
//! ```
//!
//! The building blocks are usable on their own:
//!
//! ```
//! use commodo::files::{clean_path, format_size, url_escape};
//!
//! assert_eq!(clean_path("/docs/../../etc/passwd"), "/etc/passwd");
//! assert_eq!(format_size(1048576), "1.00 MB");
//! assert_eq!(url_escape("my report.pdf"), "my%20report.pdf");
//! ```

/// Version shown in the listing footer and the `Server` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product name used in user-facing messages.
pub const NAME: &str = "Commodo";

// Export the parser module
pub mod parser;

// Export the filesystem-facing request pipeline
pub mod files;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, HttpVersion, Method, parse_request};
pub use server::{
    Error as ServerError, FileServerHandler, HttpResponse, HttpServer, ServerConfig, StatusCode,
};
