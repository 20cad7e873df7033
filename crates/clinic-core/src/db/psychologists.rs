//! Psychologist database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Psychologist;

impl Database {
    /// Insert a new psychologist.
    pub fn insert_psychologist(&self, psychologist: &Psychologist) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO psychologists (
                id, name, license_number, email, phone, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                psychologist.id,
                psychologist.name,
                psychologist.license_number,
                psychologist.email,
                psychologist.phone,
                psychologist.created_at,
                psychologist.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing psychologist.
    pub fn update_psychologist(&self, psychologist: &Psychologist) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE psychologists SET
                name = ?2,
                license_number = ?3,
                email = ?4,
                phone = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                psychologist.id,
                psychologist.name,
                psychologist.license_number,
                psychologist.email,
                psychologist.phone,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a psychologist by ID.
    pub fn get_psychologist(&self, id: &str) -> DbResult<Option<Psychologist>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, license_number, email, phone, created_at, updated_at
                FROM psychologists
                WHERE id = ?
                "#,
                [id],
                psychologist_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all psychologists by name.
    pub fn list_psychologists(&self) -> DbResult<Vec<Psychologist>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, license_number, email, phone, created_at, updated_at
            FROM psychologists
            ORDER BY name
            "#,
        )?;

        let rows = stmt.query_map([], psychologist_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a psychologist. Agendas cascade; patients are unassigned.
    pub fn delete_psychologist(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM psychologists WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

fn psychologist_row(row: &Row<'_>) -> rusqlite::Result<Psychologist> {
    Ok(Psychologist {
        id: row.get(0)?,
        name: row.get(1)?,
        license_number: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;
    use crate::models::PsychologistPayload;

    fn payload(license: &str) -> PsychologistPayload {
        PsychologistPayload {
            name: "Dra. Helena Lima".into(),
            license_number: license.into(),
            email: "helena@example.com".into(),
            phone: None,
        }
    }

    #[test]
    fn test_insert_get_update_delete() {
        let db = Database::open_in_memory().unwrap();
        let mut psychologist = Psychologist::from_payload(&payload("CRP-03/1234"));
        db.insert_psychologist(&psychologist).unwrap();

        psychologist.email = "lima@example.com".into();
        assert!(db.update_psychologist(&psychologist).unwrap());

        let retrieved = db.get_psychologist(&psychologist.id).unwrap().unwrap();
        assert_eq!(retrieved.email, "lima@example.com");
        assert!(chrono::DateTime::parse_from_rfc3339(&retrieved.updated_at).is_ok());
        assert!(retrieved.updated_at >= retrieved.created_at);
        assert_eq!(db.list_psychologists().unwrap().len(), 1);

        assert!(db.delete_psychologist(&psychologist.id).unwrap());
        assert!(db.get_psychologist(&psychologist.id).unwrap().is_none());
    }

    #[test]
    fn test_license_number_unique() {
        let db = Database::open_in_memory().unwrap();
        db.insert_psychologist(&Psychologist::from_payload(&payload("CRP-1")))
            .unwrap();
        let err = db
            .insert_psychologist(&Psychologist::from_payload(&payload("CRP-1")))
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }
}
