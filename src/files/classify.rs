//! Content classification: listing categories and response content types.

use std::fmt;
use std::path::Path;

/// Semantic kind of a listing entry, used to pick its icon.
///
/// Classification only affects presentation; the bytes served for a file
/// never depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Directory,
    Image,
    Audio,
    Video,
    Document,
    Web,
    Develop,
    File,
}

impl Category {
    /// The CSS class naming this category's icon.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Directory => "directory",
            Category::Image => "image",
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Document => "document",
            Category::Web => "web",
            Category::Develop => "develop",
            Category::File => "file",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-cased extensions, leading dot included, with their category.
pub const EXTENSION_CATEGORIES: &[(&str, Category)] = &[
    (".jpg", Category::Image),
    (".jpeg", Category::Image),
    (".png", Category::Image),
    (".bmp", Category::Image),
    (".gif", Category::Image),
    (".mp3", Category::Audio),
    (".wav", Category::Audio),
    (".wma", Category::Audio),
    (".mp4", Category::Video),
    (".mpg", Category::Video),
    (".mpeg", Category::Video),
    (".avi", Category::Video),
    (".mkv", Category::Video),
    (".pdf", Category::Document),
    (".doc", Category::Document),
    (".docx", Category::Document),
    (".text", Category::Document),
    (".ppt", Category::Document),
    (".pptx", Category::Document),
    (".xml", Category::Document),
    (".html", Category::Web),
    (".htm", Category::Web),
    (".css", Category::Web),
    (".js", Category::Web),
    (".c", Category::Develop),
    (".cpp", Category::Develop),
    (".java", Category::Develop),
    (".cs", Category::Develop),
    (".go", Category::Develop),
    (".sh", Category::Develop),
    (".rb", Category::Develop),
    (".php", Category::Develop),
    (".py", Category::Develop),
];

/// The extension of `name` including its leading dot, or `""` if it has none.
///
/// Everything from the last `.` onwards counts, so `.bashrc` has the
/// extension `.bashrc` and `archive.` has the extension `.`.
pub fn extension(name: &str) -> &str {
    name.rfind('.').map_or("", |dot| &name[dot..])
}

/// Classify a regular file by its extension, case-insensitively.
pub fn file_category(name: &str) -> Category {
    let ext = extension(name).to_ascii_lowercase();
    EXTENSION_CATEGORIES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or(Category::File, |(_, category)| *category)
}

/// Classify a listing entry: directories are always [`Category::Directory`].
pub fn entry_category(name: &str, is_dir: bool) -> Category {
    if is_dir {
        Category::Directory
    } else {
        file_category(name)
    }
}

/// Content type of a directory listing.
pub const LISTING_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Best-effort MIME type for a file, from its extension.
///
/// Returns `None` when the extension is unknown, in which case the response
/// carries no `Content-Type` at all.
pub fn content_type(name: &str) -> Option<&'static str> {
    mime_guess::from_path(Path::new(name)).first_raw()
}
