//! Person database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult, Resolved};
use crate::models::{Person, PersonPayload};

const PERSON_COLUMNS: &str =
    "id, name, birthdate, national_id, rg, phone, address, created_at, updated_at";

impl Database {
    /// Insert a new person. Fails with a constraint error if the national
    /// id is already taken.
    pub fn insert_person(&self, person: &Person) -> DbResult<()> {
        let address_json = serde_json::to_string(&person.address)?;
        self.conn.execute(
            r#"
            INSERT INTO persons (
                id, name, birthdate, national_id, rg, phone, address, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                person.id,
                person.name,
                person.birthdate,
                person.national_id,
                person.rg,
                person.phone,
                address_json,
                person.created_at,
                person.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Find the person holding `payload.national_id`, creating it from the
    /// payload when no such person exists.
    pub fn find_or_create_person(&self, payload: &PersonPayload) -> DbResult<Resolved<Person>> {
        let candidate = Person::from_payload(payload);
        let address_json = serde_json::to_string(&candidate.address)?;
        let inserted = self.conn.execute(
            r#"
            INSERT INTO persons (
                id, name, birthdate, national_id, rg, phone, address, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(national_id) DO NOTHING
            "#,
            params![
                candidate.id,
                candidate.name,
                candidate.birthdate,
                candidate.national_id,
                candidate.rg,
                candidate.phone,
                address_json,
                candidate.created_at,
                candidate.updated_at,
            ],
        )?;

        let person = self
            .find_person_by_national_id(&candidate.national_id)?
            .ok_or_else(|| DbError::NotFound(format!("person {}", candidate.national_id)))?;
        Ok(if inserted > 0 {
            Resolved::Created(person)
        } else {
            Resolved::Reused(person)
        })
    }

    /// Get a person by ID.
    pub fn get_person(&self, id: &str) -> DbResult<Option<Person>> {
        self.conn
            .query_row(
                &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?"),
                [id],
                person_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Find a person by national identifier.
    pub fn find_person_by_national_id(&self, national_id: &str) -> DbResult<Option<Person>> {
        self.conn
            .query_row(
                &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE national_id = ?"),
                [national_id],
                person_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Update a person's mutable fields.
    pub fn update_person(&self, person: &Person) -> DbResult<bool> {
        let address_json = serde_json::to_string(&person.address)?;
        let rows_affected = self.conn.execute(
            r#"
            UPDATE persons SET
                name = ?2,
                birthdate = ?3,
                rg = ?4,
                phone = ?5,
                address = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                person.id,
                person.name,
                person.birthdate,
                person.rg,
                person.phone,
                address_json,
                person.updated_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a person unless another patient still lists them as a parent.
    pub fn delete_person_if_unlinked(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            DELETE FROM persons
            WHERE id = ?1
              AND NOT EXISTS (SELECT 1 FROM patient_parents WHERE parent_id = ?1)
            "#,
            [id],
        )?;
        Ok(rows_affected > 0)
    }

    /// List the parents of a patient in the order they were linked.
    pub fn list_parents_for_patient(&self, patient_id: &str) -> DbResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.id, p.name, p.birthdate, p.national_id, p.rg, p.phone, p.address,
                   p.created_at, p.updated_at
            FROM persons p
            JOIN patient_parents pp ON pp.parent_id = p.id
            WHERE pp.patient_id = ?
            ORDER BY pp.position
            "#,
        )?;

        let rows = stmt.query_map([patient_id], person_row)?;

        let mut parents = Vec::new();
        for row in rows {
            parents.push(row?.try_into()?);
        }
        Ok(parents)
    }
}

/// Raw row from database (before JSON parsing).
struct PersonRow {
    id: String,
    name: String,
    birthdate: String,
    national_id: String,
    rg: Option<String>,
    phone: String,
    address: String,
    created_at: String,
    updated_at: String,
}

fn person_row(row: &Row<'_>) -> rusqlite::Result<PersonRow> {
    Ok(PersonRow {
        id: row.get(0)?,
        name: row.get(1)?,
        birthdate: row.get(2)?,
        national_id: row.get(3)?,
        rg: row.get(4)?,
        phone: row.get(5)?,
        address: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl TryFrom<PersonRow> for Person {
    type Error = DbError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        Ok(Person {
            id: row.id,
            name: row.name,
            birthdate: row.birthdate,
            national_id: row.national_id,
            rg: row.rg,
            phone: row.phone,
            address: serde_json::from_str(&row.address)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn payload(national_id: &str) -> PersonPayload {
        PersonPayload {
            name: "Maria Silva".into(),
            birthdate: "1985-07-21".into(),
            national_id: national_id.into(),
            rg: Some("12.345.678-9".into()),
            phone: "+55 75 99981-7980".into(),
            address: Address {
                zip_code: "44444-44".into(),
                state: "BA".into(),
                city: "Feira de Santana".into(),
                street: "Rua de Teste".into(),
                district: "Centro".into(),
                home_number: 10,
                complement: None,
            },
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let person = Person::from_payload(&payload("111"));
        db.insert_person(&person).unwrap();

        let retrieved = db.get_person(&person.id).unwrap().unwrap();
        assert_eq!(retrieved, person);
        assert_eq!(retrieved.address.city, "Feira de Santana");
    }

    #[test]
    fn test_duplicate_national_id_is_constraint() {
        let db = setup_db();
        db.insert_person(&Person::from_payload(&payload("111"))).unwrap();
        let err = db
            .insert_person(&Person::from_payload(&payload("111")))
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[test]
    fn test_find_or_create_reuses_by_national_id() {
        let db = setup_db();

        let first = db.find_or_create_person(&payload("111")).unwrap();
        assert!(first.was_created());

        let mut other = payload("111");
        other.name = "Someone Else".into();
        let second = db.find_or_create_person(&other).unwrap();
        assert!(!second.was_created());

        let second = second.into_inner();
        assert_eq!(second.id, first.into_inner().id);
        assert_eq!(second.name, "Maria Silva");
        assert_eq!(db.count_rows("persons").unwrap(), 1);
    }

    #[test]
    fn test_find_missing_is_none() {
        let db = setup_db();
        assert!(db.find_person_by_national_id("nope").unwrap().is_none());
        assert!(db.get_person("nope").unwrap().is_none());
    }

    #[test]
    fn test_update_person() {
        let db = setup_db();
        let mut person = Person::from_payload(&payload("111"));
        db.insert_person(&person).unwrap();

        person.phone = "+55 71 3333-3333".into();
        assert!(db.update_person(&person).unwrap());

        let retrieved = db.get_person(&person.id).unwrap().unwrap();
        assert_eq!(retrieved.phone, "+55 71 3333-3333");
    }

    #[test]
    fn test_default_address_column_decodes() {
        let db = setup_db();
        db.conn
            .execute(
                "INSERT INTO persons (id, name, birthdate, national_id) VALUES ('p1', 'Rafael', '2016-04-04', '111')",
                [],
            )
            .unwrap();

        let person = db.get_person("p1").unwrap().unwrap();
        assert_eq!(person.address, Address::default());
    }
}
