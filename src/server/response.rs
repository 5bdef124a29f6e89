//! HTTP response types and utilities.

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::VERSION;

/// HTTP status codes the file server produces, with their reason phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    MovedPermanently = 301,
    BadRequest = 400,
    NotFound = 404,
}

impl StatusCode {
    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }

    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// The payload of a response.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    /// An open file, streamed for exactly `len` bytes.
    File { file: File, len: u64 },
}

impl Body {
    pub fn len(&self) -> u64 {
        match self {
            Body::Empty => 0,
            Body::Bytes(bytes) => bytes.len() as u64,
            Body::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Represents an HTTP response.
///
/// Headers are kept in insertion order; setting an existing header
/// (case-insensitively) replaces its value.
#[derive(Debug)]
pub struct HttpResponse {
    /// The HTTP status code
    pub status: StatusCode,
    /// The HTTP headers
    pub headers: Vec<(String, String)>,
    /// The response body
    pub body: Body,
}

impl HttpResponse {
    /// Create a new HTTP response with the given status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: vec![("Server".to_string(), format!("commodo/{VERSION}"))],
            body: Body::Empty,
        }
    }

    /// Plain-text `404 Not Found` with the fixed message.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound)
            .with_content_type("text/plain; charset=utf-8")
            .with_body_string("404 Page not found.\n")
    }

    /// `301 Moved Permanently` to `location`, with no body.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(StatusCode::MovedPermanently).with_header("Location", location)
    }

    /// Set the response body with a string.
    pub fn with_body_string(self, body: impl Into<String>) -> Self {
        self.with_body_bytes(body.into().into_bytes())
    }

    /// Set the response body with bytes.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Body::Bytes(body.into());
        self
    }

    /// Stream the response body from an open file.
    pub fn with_body_file(mut self, file: File, len: u64) -> Self {
        self.body = Body::File { file, len };
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(existing) => existing.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }

    /// Get a header value.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serialize the status line and headers, including `Content-Length`
    /// and `Connection: close`.
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.as_u16(),
            self.status.reason_phrase()
        );
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");
        head.into_bytes()
    }

    /// Write the response to `writer`, optionally without its body.
    ///
    /// A file body is copied straight from disk; if the copy fails part of
    /// the body may already have been sent.
    pub async fn write_to<W>(self, writer: &mut W, include_body: bool) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&self.head_bytes()).await?;

        if include_body {
            match self.body {
                Body::Empty => {}
                Body::Bytes(bytes) => writer.write_all(&bytes).await?,
                Body::File { file, len } => {
                    let copied = tokio::io::copy(&mut file.take(len), &mut *writer).await?;
                    if copied < len {
                        return Err(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            format!("file ended after {copied} of {len} bytes"),
                        ));
                    }
                }
            }
        }

        writer.flush().await
    }
}
