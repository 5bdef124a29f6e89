//! Formatting helpers shared by the listing renderer and the redirect policy.

use std::borrow::Cow;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Unit suffixes for [`format_size`], one per power of 1024.
const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Weekday, month, space-padded day, 24-hour time and year,
/// e.g. `Mon Jan  2 15:04:05 2006`.
pub const MODIFIED_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Render a byte count with two decimals and a binary unit suffix.
///
/// Divides by 1024 while the value is at least 1024 and a larger unit
/// remains, so anything past a terabyte is still shown in `TB`.
///
/// ```
/// use commodo::files::format_size;
///
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
pub fn format_size(size: u64) -> String {
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", SIZE_UNITS[unit])
}

/// Everything except RFC 3986 unreserved characters gets percent-escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-escape a name for use as a single path segment inside an href.
///
/// Only RFC 3986 unreserved characters (`A-Z a-z 0-9 - _ . ~`) pass through;
/// every other byte, including reserved characters like `/` and `?`, becomes
/// `%XX` with uppercase hex. Names needing no escaping are borrowed as-is.
pub fn url_escape(name: &str) -> Cow<'_, str> {
    Cow::from(utf8_percent_encode(name, UNRESERVED))
}

/// Escape text for HTML element content and quoted attribute values.
pub fn html_escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Format a modification time in the server's local time zone.
pub fn format_modified(modified: SystemTime) -> String {
    DateTime::<Local>::from(modified)
        .format(MODIFIED_FORMAT)
        .to_string()
}
