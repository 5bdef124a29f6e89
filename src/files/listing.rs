//! HTML rendering of directory listings.

use std::fmt;
use std::io;
use std::time::SystemTime;

use log::{debug, warn};
use tokio::fs::{DirEntry, ReadDir};

use crate::files::classify::{entry_category, Category};
use crate::files::format::{format_modified, format_size, html_escape, url_escape};
use crate::VERSION;

/// Document start: doctype, inline stylesheet with icon artwork, and the
/// opening of the content container. `{title}` is replaced by the
/// escaped directory name.
const HEAD: &str = include_str!("assets/head.html");

const NAVIGATION: &str = concat!(
    "\n<a class=\"homeButton\" href=\"/\" style=\"padding: 8.5px; margin-right: 10px;\">",
    "<div class=\"home button\"></div></a>",
    "<a class=\"backButton\" href=\"../\" style=\"padding: 8.5px; margin-right: 10px;\">",
    "<div class=\"back button\"></div></a>",
);

const TABLE_BEGIN: &str = "
<table>
	<thead>
		<th></th>
		<th>Name</th>
		<th>Size</th>
		<th>Last Modified</th>
	</thead>";

const TABLE_END: &str = "\n</table>";

/// Directory entries are pulled from the stream this many at a time.
pub const BATCH_SIZE: usize = 100;

/// Where following an entry's link opens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    SameWindow,
    NewWindow,
}

impl LinkTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkTarget::SameWindow => "_self",
            LinkTarget::NewWindow => "_blank",
        }
    }
}

/// One visible row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// `name` percent-escaped for use in an href.
    pub url_path: String,
    pub category: Category,
    pub size_label: String,
    pub modified_label: String,
    pub link_target: LinkTarget,
}

impl ListingEntry {
    /// Build a row for a directory entry. Directories link in the same
    /// window and have no size; files open in a new window.
    pub fn new(name: &str, is_dir: bool, size: u64, modified: SystemTime) -> Self {
        let (size_label, link_target) = if is_dir {
            ("-".to_string(), LinkTarget::SameWindow)
        } else {
            (format_size(size), LinkTarget::NewWindow)
        };

        Self {
            name: name.to_string(),
            url_path: url_escape(name).into_owned(),
            category: entry_category(name, is_dir),
            size_label,
            modified_label: format_modified(modified),
            link_target,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.category == Category::Directory
    }
}

impl fmt::Display for ListingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n\t<tr>\
             \n\t\t<td class=\"icons\"><div class=\"{category} icon\"></div></td>\
             \n\t\t<td><a href=\"{href}\" target=\"{target}\">{name}</a></td>\
             \n\t\t<td>{size}</td>\
             \n\t\t<td>{modified}</td>\
             \n\t</tr>",
            category = self.category,
            href = html_escape(&self.url_path),
            target = self.link_target.as_str(),
            name = html_escape(&self.name),
            size = html_escape(&self.size_label),
            modified = html_escape(&self.modified_label),
        )
    }
}

/// Whether an entry is hidden from listings.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// The visible contents of one directory, grouped for display.
///
/// Both groups keep the order entries were added in; directories are
/// always rendered before files.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub title: String,
    pub directories: Vec<ListingEntry>,
    pub files: Vec<ListingEntry>,
}

impl Listing {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Add an entry to its group.
    pub fn push(&mut self, entry: ListingEntry) {
        if entry.is_dir() {
            self.directories.push(entry);
        } else {
            self.files.push(entry);
        }
    }

    /// Read every visible entry of an open directory stream.
    ///
    /// Hidden entries are skipped, as is any entry whose metadata cannot be
    /// read. A read error ends enumeration early with what was gathered.
    pub async fn read(title: impl Into<String>, entries: &mut ReadDir) -> Self {
        let mut listing = Self::new(title);

        loop {
            let batch = match next_batch(entries, BATCH_SIZE).await {
                Ok(batch) if !batch.is_empty() => batch,
                Ok(_) => break,
                Err(e) => {
                    warn!("Stopped reading directory {}: {e}", listing.title);
                    break;
                }
            };

            for entry in batch {
                let name = entry.file_name().to_string_lossy().into_owned();
                if is_hidden(&name) {
                    continue;
                }

                let metadata = match entry.metadata().await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        debug!("Skipping {name}: {e}");
                        continue;
                    }
                };
                let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                listing.push(ListingEntry::new(&name, metadata.is_dir(), metadata.len(), modified));
            }
        }

        listing
    }

    /// Number of visible entries.
    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (before_title, after_title) = HEAD.split_once("{title}").unwrap_or((HEAD, ""));
        f.write_str(before_title)?;
        f.write_str(&html_escape(&self.title))?;
        f.write_str(after_title)?;

        f.write_str(NAVIGATION)?;
        f.write_str(TABLE_BEGIN)?;
        for entry in self.directories.iter().chain(&self.files) {
            write!(f, "{entry}")?;
        }
        f.write_str(TABLE_END)?;

        write!(
            f,
            "\n</div><div class=\"footer\">\
             \n<span style=\"font-family: 'Times New Roman'; color: #2c2c2c; font-style: italic; font-size: 14px;\">\
             Served using Commodo v{VERSION}</span>\
             \n</div>\
             \n</body>\
             \n</html>\n"
        )
    }
}

/// Pull up to `limit` entries from a directory stream.
///
/// An empty batch means the stream is exhausted.
async fn next_batch(entries: &mut ReadDir, limit: usize) -> io::Result<Vec<DirEntry>> {
    let mut batch = Vec::with_capacity(limit);
    while batch.len() < limit {
        match entries.next_entry().await? {
            Some(entry) => batch.push(entry),
            None => break,
        }
    }
    Ok(batch)
}
