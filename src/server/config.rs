//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::server::error::Error;

/// Port used when none is given.
pub const DEFAULT_PORT: u16 = 4545;

/// Bytes read from a connection while looking for the end of the request head.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8192;

/// Largest request head accepted before the connection is answered with 400.
pub const MAX_HEAD_SIZE: usize = 1 << 20;

/// HTTP server configuration.
///
/// Built once at startup and shared read-only by every connection.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The directory served at `/`, canonicalized.
    pub root: PathBuf,
    /// The port to listen on, on all interfaces.
    pub port: u16,
    /// How many bytes to read per call while collecting the request head.
    pub read_buffer_size: usize,
}

impl ServerConfig {
    /// Create a configuration serving `root` on `port`.
    ///
    /// Fails with [`Error::InvalidRoot`] unless `root` exists and is a directory.
    pub fn new(root: impl AsRef<Path>, port: u16) -> Result<Self, Error> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|source| Error::InvalidRoot {
            path: root.to_path_buf(),
            source,
        })?;

        if !canonical.is_dir() {
            return Err(Error::InvalidRoot {
                path: root.to_path_buf(),
                source: std::io::Error::other("not a directory"),
            });
        }

        Ok(Self {
            root: canonical,
            port,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        })
    }

    /// The address to bind to.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
