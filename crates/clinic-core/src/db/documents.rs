//! Document database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Document, DocumentSummary};

impl Database {
    /// Insert a document row.
    pub fn insert_document(&self, document: &Document) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO documents (id, patient_id, title, doc_link, public_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                document.id,
                document.patient_id,
                document.title,
                document.doc_link,
                document.public_id,
                document.created_at,
            ],
        )?;
        Ok(())
    }

    /// Update title and blob reference of a document.
    pub fn update_document(&self, document: &Document) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE documents SET
                title = ?2,
                doc_link = ?3,
                public_id = ?4
            WHERE id = ?1
            "#,
            params![
                document.id,
                document.title,
                document.doc_link,
                document.public_id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a document by ID.
    pub fn get_document(&self, id: &str) -> DbResult<Option<Document>> {
        self.conn
            .query_row(
                r#"
                SELECT id, patient_id, title, doc_link, public_id, created_at
                FROM documents
                WHERE id = ?
                "#,
                [id],
                document_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List a patient's documents, oldest first.
    pub fn list_documents_for_patient(&self, patient_id: &str) -> DbResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, title, doc_link, public_id, created_at
            FROM documents
            WHERE patient_id = ?
            ORDER BY created_at, rowid
            "#,
        )?;

        let rows = stmt.query_map([patient_id], document_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List documents of every patient attended by a psychologist.
    pub fn list_documents_for_psychologist(
        &self,
        psychologist_id: &str,
    ) -> DbResult<Vec<DocumentSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT d.id, d.title, d.doc_link, pe.name
            FROM documents d
            JOIN patients pa ON pa.id = d.patient_id
            JOIN persons pe ON pe.id = pa.person_id
            WHERE pa.psychologist_id = ?
            ORDER BY pe.name, d.created_at, d.rowid
            "#,
        )?;

        let rows = stmt.query_map([psychologist_id], |row| {
            Ok(DocumentSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                doc_link: row.get(2)?,
                patient_name: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a document row.
    pub fn delete_document(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Delete every document row of a patient.
    pub fn delete_documents_for_patient(&self, patient_id: &str) -> DbResult<usize> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM documents WHERE patient_id = ?", [patient_id])?;
        Ok(rows_affected)
    }
}

fn document_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        title: row.get(2)?,
        doc_link: row.get(3)?,
        public_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}
