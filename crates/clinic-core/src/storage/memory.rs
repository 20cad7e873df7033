//! In-process blob store (for in-memory databases and tests).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{BlobStore, StorageError, StorageResult, StoredBlob, UploadFile};

const BASE_URL: &str = "memory://blobs";

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.lock().contains_key(public_id)
    }

    pub fn get(&self, public_id: &str) -> Option<Vec<u8>> {
        self.lock().get(public_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BlobStore for MemoryBlobStore {
    fn upload(&self, file: &UploadFile) -> StorageResult<StoredBlob> {
        file.check()?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        let public_id = match file.extension() {
            Some(ext) => format!("{id}.{ext}"),
            None => id,
        };
        self.lock().insert(public_id.clone(), file.bytes.clone());
        Ok(StoredBlob {
            url: format!("{BASE_URL}/{public_id}"),
            public_id,
        })
    }

    fn delete(&self, public_id: &str) -> StorageResult<()> {
        self.lock()
            .remove(public_id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(public_id.to_string()))
    }
}
