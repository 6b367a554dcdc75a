//! Error types for environment file I/O

use std::path::PathBuf;

/// Errors during load or save
#[derive(Debug, thiserror::Error)]
pub enum EnvStoreError {
    /// File does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error during file read
    #[error("io error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error during temp-file write or rename
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EnvStoreError {
    /// Create read error for path, mapping `NotFound` to its own variant
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Read { path, source }
        }
    }

    /// Create write error for path
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Check if the file was simply absent
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
