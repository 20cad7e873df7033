//! Patient documents.
//!
//! Bytes are uploaded to the [`BlobStore`] before any row references them.
//! When a later step fails, blobs uploaded by the same call are deleted
//! again on a best-effort basis; a failed cleanup is logged, never raised.

use crate::db::Database;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Document, DocumentSummary};
use crate::storage::{BlobStore, UploadFile};
use crate::validation::require;

/// Document operations.
pub struct DocumentService<'a> {
    db: &'a Database,
    blobs: &'a dyn BlobStore,
}

impl<'a> DocumentService<'a> {
    pub fn new(db: &'a Database, blobs: &'a dyn BlobStore) -> Self {
        Self { db, blobs }
    }

    /// Upload one file and record it under `title` for the patient.
    pub fn create(&self, title: &str, patient_id: &str, file: &UploadFile) -> ServiceResult<Document> {
        require(title, "title")?;
        if self.db.get_patient(patient_id)?.is_none() {
            return Err(ServiceError::NotFound(format!("patient {patient_id}")));
        }

        let blob = self.blobs.upload(file)?;
        let document = Document::new(patient_id.to_string(), title.trim().to_string(), blob);
        if let Err(e) = self.db.insert_document(&document) {
            self.discard(&document.public_id);
            return Err(e.into());
        }

        tracing::info!(document_id = %document.id, patient_id = %patient_id, "document uploaded");
        Ok(document)
    }

    /// Upload a batch of follow-up files, each titled with its file name.
    ///
    /// All rows are written in one transaction. On failure the transaction
    /// rolls back and every blob uploaded so far is deleted.
    pub fn create_follow_ups(
        &self,
        patient_id: &str,
        files: &[UploadFile],
    ) -> ServiceResult<Vec<Document>> {
        let mut uploaded: Vec<String> = Vec::with_capacity(files.len());

        let result = self.db.with_transaction(|db| -> ServiceResult<Vec<Document>> {
            if db.get_patient(patient_id)?.is_none() {
                return Err(ServiceError::NotFound(format!("patient {patient_id}")));
            }
            let mut documents = Vec::with_capacity(files.len());
            for file in files {
                let blob = self.blobs.upload(file)?;
                uploaded.push(blob.public_id.clone());
                let document = Document::new(patient_id.to_string(), file.file_name.clone(), blob);
                db.insert_document(&document)?;
                documents.push(document);
            }
            Ok(documents)
        });

        match result {
            Ok(documents) => {
                tracing::info!(patient_id = %patient_id, count = documents.len(), "follow-ups uploaded");
                Ok(documents)
            }
            Err(e) => {
                tracing::warn!(
                    patient_id = %patient_id,
                    error = %e,
                    uploaded = uploaded.len(),
                    "follow-up batch rolled back"
                );
                for public_id in &uploaded {
                    self.discard(public_id);
                }
                Err(ServiceError::BatchUpload(Box::new(e)))
            }
        }
    }

    pub fn find_all_by_patient(&self, patient_id: &str) -> ServiceResult<Vec<Document>> {
        Ok(self.db.list_documents_for_patient(patient_id)?)
    }

    /// Documents of every patient attended by the psychologist.
    pub fn find_all_by_psychologist(&self, psychologist_id: &str) -> ServiceResult<Vec<DocumentSummary>> {
        Ok(self.db.list_documents_for_psychologist(psychologist_id)?)
    }

    pub fn find_one(&self, id: &str) -> ServiceResult<Document> {
        self.db
            .get_document(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("document {id}")))
    }

    /// Change the title and/or replace the file.
    ///
    /// A new file is uploaded before the row changes; the previous blob is
    /// only deleted once the row points at the new one.
    pub fn update(
        &self,
        id: &str,
        title: Option<&str>,
        file: Option<&UploadFile>,
    ) -> ServiceResult<Document> {
        if let Some(title) = title {
            require(title, "title")?;
        }
        let mut document = self.find_one(id)?;
        if let Some(title) = title {
            document.title = title.trim().to_string();
        }

        let previous = match file {
            Some(file) => {
                let blob = self.blobs.upload(file)?;
                document.doc_link = blob.url;
                Some(std::mem::replace(&mut document.public_id, blob.public_id))
            }
            None => None,
        };

        if let Err(e) = self.db.update_document(&document) {
            if previous.is_some() {
                self.discard(&document.public_id);
            }
            return Err(e.into());
        }
        if let Some(previous) = previous {
            self.discard(&previous);
        }

        tracing::debug!(document_id = %id, replaced_file = file.is_some(), "document updated");
        Ok(document)
    }

    /// Delete the row, then its blob.
    pub fn remove(&self, id: &str) -> ServiceResult<()> {
        let document = self.find_one(id)?;
        self.db.delete_document(id)?;
        self.blobs.delete(&document.public_id)?;
        tracing::info!(document_id = %id, "document removed");
        Ok(())
    }

    fn discard(&self, public_id: &str) {
        if let Err(e) = self.blobs.delete(public_id) {
            tracing::warn!(public_id = %public_id, error = %e, "failed to delete orphaned blob");
        }
    }
}
