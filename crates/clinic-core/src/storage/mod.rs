//! Blob storage for uploaded documents.
//!
//! The database only keeps a document's URL and public id; bytes live behind
//! a [`BlobStore`]. Uploads must succeed before anything referencing them is
//! persisted, while deletes issued during cleanup are best-effort and their
//! failures are reported by the caller.

mod fs;
mod memory;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

use thiserror::Error;

/// Blob storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A file received from the host, ready to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lowercased extension, kept only when it is short and alphanumeric.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.file_name.rsplit_once('.')?;
        if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    fn check(&self) -> StorageResult<()> {
        if self.file_name.trim().is_empty() {
            return Err(StorageError::InvalidFile("file name is empty".into()));
        }
        if self.bytes.is_empty() {
            return Err(StorageError::InvalidFile(format!(
                "{} has no content",
                self.file_name
            )));
        }
        Ok(())
    }
}

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub url: String,
    pub public_id: String,
}

/// External file storage.
pub trait BlobStore: Send + Sync {
    /// Store the file and return its URL and identifier.
    fn upload(&self, file: &UploadFile) -> StorageResult<StoredBlob>;

    /// Delete a stored file by identifier.
    fn delete(&self, public_id: &str) -> StorageResult<()>;
}
