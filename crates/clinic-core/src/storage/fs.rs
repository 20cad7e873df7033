//! On-disk blob store.
//!
//! Layout:
//!
//! ```text
//! <root>/
//! └── ab/                          # first two hex chars of the digest
//!     └── ab3f9e…-<uuid>.pdf       # sha256(bytes)-<upload id>.<ext>
//! ```
//!
//! The digest prefix lets [`FsBlobStore::verify`] detect corrupted files;
//! the upload id keeps identical uploads independent, so deleting one
//! document never removes another document's bytes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::{BlobStore, StorageError, StorageResult, StoredBlob, UploadFile};

const DIGEST_HEX_LEN: usize = 64;

/// Blob store writing files under a root directory.
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    /// Open (and create if needed) a store rooted at `root`. URLs are
    /// `<base_url>/<public_id>`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recompute the digest of a stored blob and compare it with its id.
    pub fn verify(&self, public_id: &str) -> StorageResult<bool> {
        let path = self.blob_path(public_id)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(public_id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(digest_hex(&bytes) == public_id[..DIGEST_HEX_LEN])
    }

    /// Map an identifier to its path, refusing anything we did not mint.
    fn blob_path(&self, public_id: &str) -> StorageResult<PathBuf> {
        let well_formed = public_id.is_ascii()
            && public_id.len() > DIGEST_HEX_LEN
            && public_id[..DIGEST_HEX_LEN]
                .chars()
                .all(|c| c.is_ascii_hexdigit())
            && public_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            && !public_id.contains("..");
        if !well_formed {
            return Err(StorageError::NotFound(public_id.to_string()));
        }
        Ok(self.root.join(&public_id[..2]).join(public_id))
    }
}

impl BlobStore for FsBlobStore {
    fn upload(&self, file: &UploadFile) -> StorageResult<StoredBlob> {
        file.check()?;

        let upload_id = uuid::Uuid::new_v4().simple().to_string();
        let public_id = match file.extension() {
            Some(ext) => format!("{}-{}.{}", digest_hex(&file.bytes), upload_id, ext),
            None => format!("{}-{}", digest_hex(&file.bytes), upload_id),
        };

        let path = self.blob_path(&public_id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &file.bytes)?;

        tracing::debug!(public_id = %public_id, bytes = file.bytes.len(), "stored blob");
        Ok(StoredBlob {
            url: format!("{}/{}", self.base_url, public_id),
            public_id,
        })
    }

    fn delete(&self, public_id: &str) -> StorageResult<()> {
        let path = self.blob_path(public_id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(public_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn digest_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
