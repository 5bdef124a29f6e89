//! Mapping request paths onto the served tree and presenting what is found.
//!
//! A request flows through these pieces in order: [`resolve`] turns the path
//! into an open target inside the root, [`redirect`] fixes up trailing
//! slashes, [`classify`] picks content types and icons, and [`listing`]
//! renders directories. Nothing here holds state between requests.

pub mod classify;
mod error;
pub mod format;
pub mod listing;
pub mod redirect;
pub mod resolve;
mod tests;

// Re-export public items
pub use classify::{content_type, entry_category, file_category, Category, LISTING_CONTENT_TYPE};
pub use error::Error;
pub use format::{format_modified, format_size, html_escape, url_escape};
pub use listing::{LinkTarget, Listing, ListingEntry};
pub use redirect::Decision;
pub use resolve::{clean_path, normalize, open, resolve_path, Opened, ResolvedTarget};
