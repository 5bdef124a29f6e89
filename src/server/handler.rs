//! The request handler serving the directory tree.

use std::path::PathBuf;

use log::debug;

use crate::files::{self, redirect, Decision, Listing, Opened, LISTING_CONTENT_TYPE};
use crate::parser::HttpRequest;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};

/// Answers every request under `/` from the configured root directory.
///
/// Holds nothing but the root, so one handler is shared by all connections.
#[derive(Debug, Clone)]
pub struct FileServerHandler {
    root: PathBuf,
}

impl FileServerHandler {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            root: config.root.clone(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Resolve, redirect or render the request.
    ///
    /// Returns [`Error::NotFound`] when the path does not resolve; the
    /// target's handle is dropped on every path out of this function except
    /// a file response, which carries it until the body is written.
    pub async fn handle(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        let request_path = files::normalize(&request.path);
        let target = files::open(&self.root, &request_path).await?;

        if let Decision::Redirect(location) =
            redirect::check(&request_path, request.raw_query.as_deref(), target.is_dir)
        {
            debug!("Redirecting {request_path} to {location}");
            return Ok(HttpResponse::redirect(location));
        }

        match target.handle {
            Opened::Directory(mut entries) => {
                let listing = Listing::read(target.name, &mut entries).await;
                debug!("Listing {} with {} entries", target.canonical_path, listing.len());
                Ok(HttpResponse::new(StatusCode::Ok)
                    .with_content_type(LISTING_CONTENT_TYPE)
                    .with_body_string(listing.to_string()))
            }
            Opened::File(file) => {
                let mut response = HttpResponse::new(StatusCode::Ok);
                if let Some(content_type) = files::content_type(&target.name) {
                    response = response.with_content_type(content_type);
                }
                Ok(response.with_body_file(file, target.size))
            }
        }
    }
}
