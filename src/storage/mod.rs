pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use async_trait::async_trait;
use std::path::Path;

/// Flat-file store for uploaded asset sheets, addressed by filename.
///
/// The analyzer side only ever reads; writes happen on upload. Concurrent
/// writes to the same filename inherit last-writer-wins from the backend.
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), AppError>;

    /// Load a previously uploaded file. Missing files are `AppError::NotFound`.
    async fn load(&self, filename: &str) -> Result<Vec<u8>, AppError>;
}

/// Reduce an uploaded filename to its final path component so a crafted name
/// cannot escape the upload directory.
pub fn sanitize_filename(name: &str) -> Result<String, AppError> {
    let sanitized = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return Err(AppError::BadRequest(format!(
            "Invalid upload filename: {:?}",
            name
        )));
    }

    Ok(sanitized.to_string())
}
