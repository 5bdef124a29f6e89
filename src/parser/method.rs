//! HTTP request methods.

use std::fmt;
use std::str::FromStr;

use crate::parser::error::Error;

/// HTTP request methods as defined in RFC 7231 and common extensions.
///
/// The file server answers every method the same way; only `HEAD` changes
/// what is written, since it never carries a body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    /// Same as GET but only transfers the status line and header section.
    HEAD,
    OPTIONS,
    PATCH,
    TRACE,
    CONNECT,
    /// Any other method token, e.g. WebDAV's `PROPFIND`. Methods are
    /// case-sensitive, so `get` lands here too.
    Extension(String),
}

impl Method {
    /// Whether responses to this method consist of headers only.
    pub fn is_metadata_only(&self) -> bool {
        matches!(self, Method::HEAD)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::TRACE => "TRACE",
            Method::CONNECT => "CONNECT",
            Method::Extension(token) => token,
        }
    }
}

/// RFC 9110 `tchar`: the characters allowed in a method token.
fn is_token_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&byte)
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "HEAD" => Ok(Method::HEAD),
            "OPTIONS" => Ok(Method::OPTIONS),
            "PATCH" => Ok(Method::PATCH),
            "TRACE" => Ok(Method::TRACE),
            "CONNECT" => Ok(Method::CONNECT),
            _ if !s.is_empty() && s.bytes().all(is_token_char) => Ok(Method::Extension(s.to_string())),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
