use anyhow::Result;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::io::{AsyncRead, AsyncWriteExt};
use uuid::Uuid;

/// Outcome of a successful store: the generated filename, the path the
/// record keeps (and later hands back to `remove`), and the byte count.
pub struct StoredFile {
    pub filename: String,
    pub path: String,
    pub size: i64,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    async fn store<'a>(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredFile>;

    /// Removing an already-absent path is not an error.
    async fn remove(&self, path: &str) -> Result<()>;

    async fn exists(&self, path: &str) -> Result<bool>;
}

/// Stores uploads on the local filesystem under a single directory, one
/// uuid-named file per upload.
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Keeps only a short alphanumeric extension from the client filename.
    fn sanitized_extension(original_name: &str) -> Option<String> {
        let ext = Path::new(original_name).extension()?.to_str()?;
        if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Stored paths always point inside the storage root.
    fn contained(&self, path: &str) -> bool {
        let path = Path::new(path);
        path.starts_with(&self.root)
            && path
                .components()
                .all(|c| !matches!(c, Component::ParentDir))
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn store<'a>(
        &self,
        original_name: &str,
        _content_type: Option<&str>,
        mut reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredFile> {
        let filename = match Self::sanitized_extension(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let dest = self.root.join(&filename);

        let mut file = tokio::fs::File::create(&dest).await?;
        let size = match tokio::io::copy(&mut reader, &mut file).await {
            Ok(size) => size,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&dest).await;
                return Err(e.into());
            }
        };
        file.flush().await?;

        Ok(StoredFile {
            filename,
            path: dest.to_string_lossy().into_owned(),
            size: size as i64,
        })
    }

    async fn remove(&self, path: &str) -> Result<()> {
        if !self.contained(path) {
            anyhow::bail!("refusing to remove path outside storage root: {}", path);
        }

        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("File already absent on remove: {}", path);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        if !self.contained(path) {
            return Ok(false);
        }
        Ok(tokio::fs::try_exists(path).await?)
    }
}
