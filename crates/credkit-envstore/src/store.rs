//! File I/O for environment documents
//!
//! [`EnvStore`] owns the template and target paths for the duration of a run.
//! Nothing else in the workspace reads or writes those files.

use crate::document::EnvDocument;
use crate::error::EnvStoreError;
use crate::session::SessionConfig;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Read and parse an environment file
///
/// # Errors
/// - `EnvStoreError::NotFound` if the file does not exist
/// - `EnvStoreError::Read` for any other read failure
pub async fn load(path: impl AsRef<Path>) -> Result<EnvDocument, EnvStoreError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| EnvStoreError::read(path, e))?;
    let document = EnvDocument::parse(&text);
    tracing::debug!(path = %path.display(), lines = document.line_count(), "loaded env file");
    Ok(document)
}

/// Serialize `document` and replace `path` atomically
///
/// The contents go to a temporary file in the same directory, are synced,
/// and then renamed over `path`. A crash leaves either the old file or the
/// new one. On Unix the temporary file, and so the result, is mode `0600`.
///
/// # Errors
/// `EnvStoreError::Write` with the underlying cause.
pub async fn save(path: impl AsRef<Path>, document: &EnvDocument) -> Result<(), EnvStoreError> {
    let path = path.as_ref().to_path_buf();
    let contents = document.render();
    let task_path = path.clone();

    tokio::task::spawn_blocking(move || write_atomic(&task_path, contents.as_bytes()))
        .await
        .map_err(|e| EnvStoreError::write(&path, std::io::Error::other(e)))??;

    tracing::info!(path = %path.display(), "saved env file");
    Ok(())
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), EnvStoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".credkit-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| EnvStoreError::write(path, e))?;

    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| EnvStoreError::write(path, e))?;

    tmp.persist(path)
        .map_err(|e| EnvStoreError::write(path, e.error))?;
    Ok(())
}

/// Template and target pair for one run
#[derive(Debug, Clone)]
pub struct EnvStore {
    template: PathBuf,
    target: PathBuf,
}

impl EnvStore {
    /// Create store over a template and target path
    #[inline]
    #[must_use]
    pub fn new(template: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            target: target.into(),
        }
    }

    /// Template file
    #[inline]
    #[must_use]
    pub fn template_path(&self) -> &Path {
        &self.template
    }

    /// Environment file written on commit
    #[inline]
    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target
    }

    /// Load the template; a missing template is reported as `NotFound`
    ///
    /// # Errors
    /// See [`load`].
    pub async fn load_template(&self) -> Result<EnvDocument, EnvStoreError> {
        load(&self.template).await
    }

    /// Whether the target file already exists
    pub async fn target_exists(&self) -> bool {
        tokio::fs::try_exists(&self.target).await.unwrap_or(false)
    }

    /// Load the existing target file
    ///
    /// # Errors
    /// See [`load`].
    pub async fn load_target(&self) -> Result<EnvDocument, EnvStoreError> {
        load(&self.target).await
    }

    /// Merge `values` into `template` and write the target
    ///
    /// Returns the document that was written.
    ///
    /// # Errors
    /// See [`save`].
    pub async fn commit(
        &self,
        template: EnvDocument,
        values: &SessionConfig,
    ) -> Result<EnvDocument, EnvStoreError> {
        let merged = template.merge(values);
        save(&self.target, &merged).await?;
        Ok(merged)
    }
}
