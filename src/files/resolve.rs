//! Mapping request paths onto the served directory tree.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::debug;
use tokio::fs::{self, File, ReadDir};

use crate::files::error::Error;

/// An open handle on a resolved target.
///
/// Dropping it closes the underlying file or directory stream, so every exit
/// from a request, early or not, releases it.
#[derive(Debug)]
pub enum Opened {
    File(File),
    Directory(ReadDir),
}

/// A filesystem entry a request path resolved to.
#[derive(Debug)]
pub struct ResolvedTarget {
    /// The cleaned request path, always starting with `/`.
    pub canonical_path: String,
    /// Where the target lives on disk; always inside the root directory.
    pub fs_path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
    pub modified: SystemTime,
    /// Base name of the target on disk.
    pub name: String,
    pub handle: Opened,
}

/// Ensure the request path starts with `/`.
pub fn normalize(request_path: &str) -> Cow<'_, str> {
    if request_path.starts_with('/') {
        Cow::Borrowed(request_path)
    } else {
        Cow::Owned(format!("/{request_path}"))
    }
}

/// Lexically clean a request path.
///
/// Repeated separators and `.` segments are dropped and each `..` removes the
/// preceding segment. A `..` at the top is discarded, so the result can never
/// climb above `/`. The result always starts with `/` and never ends with one
/// unless it is `/` itself.
pub fn clean_path(request_path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Join a request path onto `root` after cleaning it.
pub fn resolve_path(root: &Path, request_path: &str) -> PathBuf {
    let mut resolved = root.to_path_buf();
    for segment in clean_path(request_path).split('/').filter(|s| !s.is_empty()) {
        resolved.push(segment);
    }
    resolved
}

/// Resolve a request path under `root`, open it and read its metadata.
///
/// Symbolic links are followed, like a plain open would. Any failure is
/// reported as [`Error::NotFound`]; callers decide what the client sees.
pub async fn open(root: &Path, request_path: &str) -> Result<ResolvedTarget, Error> {
    let canonical_path = clean_path(&normalize(request_path));
    let fs_path = resolve_path(root, &canonical_path);

    let not_found = |source: std::io::Error| {
        debug!("Cannot open {}: {source}", fs_path.display());
        Error::NotFound {
            path: canonical_path.clone(),
            source,
        }
    };

    let metadata = fs::metadata(&fs_path).await.map_err(not_found)?;
    let (handle, metadata) = if metadata.is_dir() {
        let entries = fs::read_dir(&fs_path).await.map_err(not_found)?;
        (Opened::Directory(entries), metadata)
    } else {
        let file = File::open(&fs_path).await.map_err(not_found)?;
        let metadata = file.metadata().await.map_err(not_found)?;
        (Opened::File(file), metadata)
    };
    let modified = metadata.modified().map_err(not_found)?;

    let name = fs_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "/".to_string());

    Ok(ResolvedTarget {
        is_dir: metadata.is_dir(),
        size: metadata.len(),
        modified,
        name,
        handle,
        canonical_path,
        fs_path,
    })
}
