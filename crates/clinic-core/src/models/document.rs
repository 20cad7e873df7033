//! Uploaded document records.

use serde::{Deserialize, Serialize};

use crate::storage::StoredBlob;

/// A document whose bytes live in the blob store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub patient_id: String,
    pub title: String,
    /// URL returned by the blob store
    pub doc_link: String,
    /// Blob store identifier, used for deletion
    pub public_id: String,
    pub created_at: String,
}

impl Document {
    pub fn new(patient_id: String, title: String, blob: StoredBlob) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            title,
            doc_link: blob.url,
            public_id: blob.public_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Document listing row for a psychologist's patients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub doc_link: String,
    pub patient_name: String,
}
