//! HTTP request parsing and representation.

use std::collections::HashMap;
use std::str::FromStr;
use percent_encoding::percent_decode_str;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

/// Represents the head of an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET, HEAD, etc.)
    pub method: Method,
    /// The percent-decoded request path, without the query string
    pub path: String,
    /// The raw query string following the first `?`, if any
    pub raw_query: Option<String>,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    /// Create a new HTTP request.
    ///
    /// # Arguments
    ///
    /// * `method` - The HTTP method
    /// * `path` - The decoded request path
    /// * `raw_query` - The undecoded query string, without the leading `?`
    /// * `version` - The HTTP version
    /// * `headers` - The HTTP headers
    pub fn new(
        method: Method,
        path: String,
        raw_query: Option<String>,
        version: HttpVersion,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            method,
            path,
            raw_query,
            version,
            headers,
        }
    }
}

/// Split a request target into its decoded path and raw query string.
///
/// The query is kept verbatim so it can be echoed back in redirects.
fn split_target(target: &str) -> Result<(String, Option<String>), Error> {
    let (raw_path, raw_query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (target, None),
    };

    let path = percent_decode_str(raw_path)
        .decode_utf8()
        .map_err(|_| Error::InvalidPath)?
        .into_owned();

    Ok((path, raw_query.filter(|q| !q.is_empty())))
}

/// Parse an HTTP request head from a byte slice.
///
/// # Arguments
///
/// * `input` - A byte slice containing the HTTP request to parse
///
/// # Returns
///
/// The parsed HTTP request, or an error if the request is invalid
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let input_str = match std::str::from_utf8(input) {
        Ok(s) => s,
        Err(_) => return Err(Error::MalformedRequestLine("Invalid UTF-8".to_string())),
    };

    let mut lines = input_str.lines();

    let request_line = match lines.next() {
        Some(line) if !line.trim().is_empty() => line,
        _ => return Err(Error::EmptyRequest),
    };

    // Split the request line into method, target, and version
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    }

    let method = Method::from_str(parts[0])?;

    if parts[1].is_empty() {
        return Err(Error::InvalidPath);
    }
    let (path, raw_query) = split_target(parts[1])?;

    let version = HttpVersion::from_str(parts[2])?;

    let mut headers = HashMap::new();
    for line in lines {
        // Empty line indicates the end of headers
        if line.is_empty() {
            break;
        }

        let (name, value) = line.split_once(':').ok_or(Error::InvalidHeaderFormat)?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }

    if version == HttpVersion::Http11 && !headers.keys().any(|k| k.eq_ignore_ascii_case("Host")) {
        return Err(Error::MissingHeader("Host".to_string()));
    }

    Ok(HttpRequest::new(method, path, raw_query, version, headers))
}
