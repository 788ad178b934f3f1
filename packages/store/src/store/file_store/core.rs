//! Core type and URI handling for the file loader

use super::session::{DirSession, PemSession};
use crate::config::{DEFAULT_SCHEME, FileLoaderConfig};
use crate::traits::{LoaderCtx, StoreLoader};
use crate::ui::UiHandle;
use crate::{Result, StoreError};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Loader for local files and directories
#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    config: FileLoaderConfig,
}

impl FileLoader {
    /// Create a file loader with the given limits
    #[must_use]
    pub fn new(config: FileLoaderConfig) -> Self {
        Self { config }
    }

    /// Map a `file:` URI or bare path to a filesystem path
    ///
    /// `file:///p` and `file://localhost/p` both name `/p`; any other
    /// authority is rejected.
    pub(crate) fn path_for_uri(uri: &str) -> Result<PathBuf> {
        let path = match uri.strip_prefix("file:") {
            None => uri,
            Some(rest) => match rest.strip_prefix("//") {
                None => rest,
                Some(after) if after.starts_with('/') => after,
                Some(after) => match after.strip_prefix("localhost") {
                    Some(local) if local.starts_with('/') => local,
                    _ => {
                        return Err(StoreError::invalid_argument(format!(
                            "file URI authority must be empty or localhost: {uri}"
                        )));
                    }
                },
            },
        };

        if path.is_empty() {
            return Err(StoreError::invalid_argument("file URI has no path"));
        }
        Ok(PathBuf::from(path))
    }
}

impl StoreLoader for FileLoader {
    fn scheme(&self) -> &str {
        DEFAULT_SCHEME
    }

    fn open(&self, uri: &str, _ui: Option<&UiHandle>) -> Result<Box<dyn LoaderCtx>> {
        let path = Self::path_for_uri(uri)?;
        let metadata = fs::metadata(&path)?;

        if metadata.is_dir() {
            let mut entries = Vec::new();
            for entry in fs::read_dir(&path)? {
                let entry = entry?;
                entries.push(entry.file_name().to_string_lossy().into_owned());
            }
            tracing::debug!(path = %path.display(), entries = entries.len(), "Listing directory");
            return Ok(Box::new(DirSession::new(uri, entries)));
        }

        if metadata.len() > self.config.max_input_size {
            return Err(StoreError::invalid_argument(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                metadata.len(),
                self.config.max_input_size
            )));
        }

        let file = fs::File::open(&path)?;
        tracing::debug!(path = %path.display(), "Opened file");
        Ok(Box::new(PemSession::open(
            Box::new(file),
            self.config.max_input_size,
        )))
    }

    fn attach(&self, reader: Box<dyn Read + Send>) -> Result<Box<dyn LoaderCtx>> {
        Ok(Box::new(PemSession::attach(
            reader,
            self.config.max_input_size,
        )))
    }
}
