use crate::error::AppError;
use crate::health::{HealthCheckResult, HealthChecker};
use crate::storage::{UploadStore, sanitize_filename};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

/// Upload store backed by a directory on disk, one file per upload.
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    /// Create the store, creating the upload directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        info!("Upload storage at {}", root.display());
        Ok(Self { root })
    }

    fn path_for(&self, filename: &str) -> Result<PathBuf, AppError> {
        Ok(self.root.join(sanitize_filename(filename)?))
    }
}

#[async_trait]
impl UploadStore for FilesystemStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), AppError> {
        let path = self.path_for(filename)?;
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn load(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        let path = self.path_for(filename)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(AppError::NotFound(format!(
                "No uploaded file named {}",
                filename
            ))),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl HealthChecker for FilesystemStore {
    fn name(&self) -> &str {
        "storage"
    }

    async fn check(&self) -> HealthCheckResult {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => HealthCheckResult::healthy(),
            Ok(_) => HealthCheckResult::unhealthy(format!(
                "Upload path {} is not a directory",
                self.root.display()
            )),
            Err(err) => HealthCheckResult::unhealthy(format!(
                "Upload directory {} unavailable: {}",
                self.root.display(),
                err
            )),
        }
    }
}
