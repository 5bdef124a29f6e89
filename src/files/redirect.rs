//! Trailing-slash canonicalization for directory and file URLs.

use crate::files::format::url_escape;

/// What to do with a request once its target is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Answer with `301 Moved Permanently` to this relative location.
    Redirect(String),
    /// The URL already matches the target's kind.
    Serve,
}

/// Last segment of a slash-separated path, ignoring trailing slashes.
fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

fn with_query(mut location: String, raw_query: Option<&str>) -> String {
    if let Some(query) = raw_query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(query);
    }
    location
}

/// Reconcile the request path's trailing slash with the target's kind.
///
/// Directories must be addressed with a trailing `/` and files without one.
/// Locations are relative to the requested URL: `name/` for a directory and
/// `../name` for a file. The query string, if any, is carried over verbatim.
pub fn check(request_path: &str, raw_query: Option<&str>, is_dir: bool) -> Decision {
    let has_trailing_slash = request_path.ends_with('/');

    if is_dir && !has_trailing_slash {
        let location = format!("{}/", url_escape(base_name(request_path)));
        Decision::Redirect(with_query(location, raw_query))
    } else if !is_dir && has_trailing_slash {
        let location = format!("../{}", url_escape(base_name(request_path)));
        Decision::Redirect(with_query(location, raw_query))
    } else {
        Decision::Serve
    }
}
