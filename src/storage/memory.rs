use crate::error::AppError;
use crate::health::{HealthCheckResult, HealthChecker};
use crate::storage::{UploadStore, sanitize_filename};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory upload store used by tests and as a storage-less deployment
/// option.
#[derive(Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl UploadStore for MemoryStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), AppError> {
        let filename = sanitize_filename(filename)?;
        self.files.write().await.insert(filename, bytes.to_vec());
        Ok(())
    }

    async fn load(&self, filename: &str) -> Result<Vec<u8>, AppError> {
        let filename = sanitize_filename(filename)?;
        self.files
            .read()
            .await
            .get(&filename)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No uploaded file named {}", filename)))
    }
}

#[async_trait]
impl HealthChecker for MemoryStore {
    fn name(&self) -> &str {
        "storage"
    }

    async fn check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy()
    }
}
