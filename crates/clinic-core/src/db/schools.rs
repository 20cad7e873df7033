//! School and comorbidity database operations.
//!
//! Both are shared records keyed by name; creation always goes through the
//! find-or-create primitives so concurrent writers cannot duplicate them.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult, Resolved};
use crate::models::{Comorbidity, School, SchoolPayload};

impl Database {
    /// Find the school named `payload.name`, creating it when absent.
    pub fn find_or_create_school(&self, payload: &SchoolPayload) -> DbResult<Resolved<School>> {
        let candidate = School::from_payload(payload);
        let address_json = serde_json::to_string(&candidate.address)?;
        let inserted = self.conn.execute(
            r#"
            INSERT INTO schools (id, name, tax_id, phone, address, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(name) DO NOTHING
            "#,
            params![
                candidate.id,
                candidate.name,
                candidate.tax_id,
                candidate.phone,
                address_json,
                candidate.created_at,
                candidate.updated_at,
            ],
        )?;

        let school = self
            .find_school_by_name(&candidate.name)?
            .ok_or_else(|| DbError::NotFound(format!("school {}", candidate.name)))?;
        Ok(if inserted > 0 {
            Resolved::Created(school)
        } else {
            Resolved::Reused(school)
        })
    }

    /// Get a school by ID.
    pub fn get_school(&self, id: &str) -> DbResult<Option<School>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, tax_id, phone, address, created_at, updated_at
                FROM schools
                WHERE id = ?
                "#,
                [id],
                school_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Find a school by its unique name.
    pub fn find_school_by_name(&self, name: &str) -> DbResult<Option<School>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, tax_id, phone, address, created_at, updated_at
                FROM schools
                WHERE name = ?
                "#,
                [name],
                school_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Find the comorbidity with this exact name, creating it when absent.
    pub fn find_or_create_comorbidity(&self, name: &str) -> DbResult<Resolved<Comorbidity>> {
        let candidate = Comorbidity::new(name.to_string());
        let inserted = self.conn.execute(
            r#"
            INSERT INTO comorbidities (id, name, created_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO NOTHING
            "#,
            params![candidate.id, candidate.name, candidate.created_at],
        )?;

        let comorbidity = self
            .find_comorbidity_by_name(name)?
            .ok_or_else(|| DbError::NotFound(format!("comorbidity {name}")))?;
        Ok(if inserted > 0 {
            Resolved::Created(comorbidity)
        } else {
            Resolved::Reused(comorbidity)
        })
    }

    /// Find a comorbidity by exact name.
    pub fn find_comorbidity_by_name(&self, name: &str) -> DbResult<Option<Comorbidity>> {
        self.conn
            .query_row(
                "SELECT id, name, created_at FROM comorbidities WHERE name = ?",
                [name],
                comorbidity_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List comorbidities linked to a patient.
    pub fn list_comorbidities_for_patient(&self, patient_id: &str) -> DbResult<Vec<Comorbidity>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT c.id, c.name, c.created_at
            FROM comorbidities c
            JOIN patient_comorbidities pc ON pc.comorbidity_id = c.id
            WHERE pc.patient_id = ?
            ORDER BY pc.position
            "#,
        )?;

        let rows = stmt.query_map([patient_id], comorbidity_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

struct SchoolRow {
    id: String,
    name: String,
    tax_id: String,
    phone: Option<String>,
    address: String,
    created_at: String,
    updated_at: String,
}

fn school_row(row: &Row<'_>) -> rusqlite::Result<SchoolRow> {
    Ok(SchoolRow {
        id: row.get(0)?,
        name: row.get(1)?,
        tax_id: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl TryFrom<SchoolRow> for School {
    type Error = DbError;

    fn try_from(row: SchoolRow) -> Result<Self, Self::Error> {
        Ok(School {
            id: row.id,
            name: row.name,
            tax_id: row.tax_id,
            phone: row.phone,
            address: serde_json::from_str(&row.address)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn comorbidity_row(row: &Row<'_>) -> rusqlite::Result<Comorbidity> {
    Ok(Comorbidity {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn school_payload(name: &str) -> SchoolPayload {
        SchoolPayload {
            name: name.into(),
            tax_id: "00.000.0000/0001-00".into(),
            phone: None,
            address: Address::default(),
        }
    }

    #[test]
    fn test_find_or_create_school() {
        let db = setup_db();

        let created = db.find_or_create_school(&school_payload("Ativa Idade")).unwrap();
        assert!(created.was_created());
        let created = created.into_inner();

        let reused = db.find_or_create_school(&school_payload("Ativa Idade")).unwrap();
        assert!(!reused.was_created());
        assert_eq!(reused.into_inner().id, created.id);

        assert_eq!(db.count_rows("schools").unwrap(), 1);
        assert_eq!(db.get_school(&created.id).unwrap().unwrap().name, "Ativa Idade");
    }

    #[test]
    fn test_distinct_schools() {
        let db = setup_db();
        db.find_or_create_school(&school_payload("Escola A")).unwrap();
        db.find_or_create_school(&school_payload("Escola B")).unwrap();
        assert_eq!(db.count_rows("schools").unwrap(), 2);
    }

    #[test]
    fn test_find_or_create_comorbidity_exact_name() {
        let db = setup_db();

        let adhd = db.find_or_create_comorbidity("ADHD").unwrap().into_inner();
        let again = db.find_or_create_comorbidity("ADHD").unwrap();
        assert!(!again.was_created());
        assert_eq!(again.into_inner().id, adhd.id);

        // Exact match only
        assert!(db.find_or_create_comorbidity("adhd").unwrap().was_created());
        assert_eq!(db.count_rows("comorbidities").unwrap(), 2);
    }

    #[test]
    fn test_missing_school_is_none() {
        let db = setup_db();
        assert!(db.find_school_by_name("Nowhere").unwrap().is_none());
        assert!(db.find_comorbidity_by_name("None").unwrap().is_none());
    }
}
