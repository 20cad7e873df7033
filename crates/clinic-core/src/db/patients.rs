//! Patient and medicine database operations.
//!
//! A patient row only stores foreign keys; [`Database::get_patient`] loads
//! the person, school, comorbidities, parents and medicines around it.
//! Multi-statement writes here are not atomic on their own and are meant to
//! run inside [`Database::with_transaction`].

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Medicine, Patient, PaymentPlan};

impl Database {
    /// Insert a patient row plus its comorbidity/parent links and medicines.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, payment_plan, person_id, school_id, psychologist_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                patient.id,
                patient.payment_plan.as_str(),
                patient.person.id,
                patient.school.id,
                patient.psychologist_id,
                patient.created_at,
                patient.updated_at,
            ],
        )?;

        for comorbidity in &patient.comorbidities {
            self.link_comorbidity(&patient.id, &comorbidity.id)?;
        }
        for parent in &patient.parents {
            self.link_parent(&patient.id, &parent.id)?;
        }
        for medicine in &patient.medicines {
            self.insert_medicine(medicine)?;
        }
        Ok(())
    }

    /// Update the patient row (payment plan, school, psychologist).
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                payment_plan = ?2,
                school_id = ?3,
                psychologist_id = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.payment_plan.as_str(),
                patient.school.id,
                patient.psychologist_id,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a fully loaded patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                r#"
                SELECT id, payment_plan, person_id, school_id, psychologist_id,
                       created_at, updated_at
                FROM patients
                WHERE id = ?
                "#,
                [id],
                patient_row,
            )
            .optional()?
            .map(|row| self.load_patient(row))
            .transpose()
    }

    /// List all patients, oldest first.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, payment_plan, person_id, school_id, psychologist_id,
                   created_at, updated_at
            FROM patients
            ORDER BY created_at, rowid
            "#,
        )?;

        let rows = stmt
            .query_map([], patient_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(|row| self.load_patient(row)).collect()
    }

    /// Delete a patient. Medicines and link rows cascade.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Link a comorbidity to a patient. Returns false if already linked.
    pub fn link_comorbidity(&self, patient_id: &str, comorbidity_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            INSERT INTO patient_comorbidities (patient_id, comorbidity_id, position)
            VALUES (
                ?1, ?2,
                (SELECT COALESCE(MAX(position), -1) + 1 FROM patient_comorbidities WHERE patient_id = ?1)
            )
            ON CONFLICT(patient_id, comorbidity_id) DO NOTHING
            "#,
            [patient_id, comorbidity_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Link a parent to a patient. Returns false if already linked.
    pub fn link_parent(&self, patient_id: &str, parent_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            INSERT INTO patient_parents (patient_id, parent_id, position)
            VALUES (
                ?1, ?2,
                (SELECT COALESCE(MAX(position), -1) + 1 FROM patient_parents WHERE patient_id = ?1)
            )
            ON CONFLICT(patient_id, parent_id) DO NOTHING
            "#,
            [patient_id, parent_id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Insert a medicine owned by `medicine.patient_id`.
    pub fn insert_medicine(&self, medicine: &Medicine) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO medicines (id, patient_id, name, dosage, frequency, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                medicine.id,
                medicine.patient_id,
                medicine.name,
                medicine.dosage,
                medicine.frequency,
                medicine.notes,
                medicine.created_at,
            ],
        )?;
        Ok(())
    }

    /// List a patient's medicines in insertion order.
    pub fn list_medicines_for_patient(&self, patient_id: &str) -> DbResult<Vec<Medicine>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, name, dosage, frequency, notes, created_at
            FROM medicines
            WHERE patient_id = ?
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([patient_id], |row| {
            Ok(Medicine {
                id: row.get(0)?,
                patient_id: row.get(1)?,
                name: row.get(2)?,
                dosage: row.get(3)?,
                frequency: row.get(4)?,
                notes: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a medicine only if it belongs to the given patient.
    pub fn delete_medicine(&self, patient_id: &str, medicine_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM medicines WHERE id = ? AND patient_id = ?",
            [medicine_id, patient_id],
        )?;
        Ok(rows_affected > 0)
    }

    fn load_patient(&self, row: PatientRow) -> DbResult<Patient> {
        let payment_plan = PaymentPlan::parse(&row.payment_plan).ok_or_else(|| {
            DbError::Constraint(format!("unknown payment plan: {}", row.payment_plan))
        })?;
        let person = self
            .get_person(&row.person_id)?
            .ok_or_else(|| DbError::NotFound(format!("person {} of patient {}", row.person_id, row.id)))?;
        let school = self
            .get_school(&row.school_id)?
            .ok_or_else(|| DbError::NotFound(format!("school {} of patient {}", row.school_id, row.id)))?;

        Ok(Patient {
            comorbidities: self.list_comorbidities_for_patient(&row.id)?,
            medicines: self.list_medicines_for_patient(&row.id)?,
            parents: self.list_parents_for_patient(&row.id)?,
            id: row.id,
            payment_plan,
            person,
            school,
            psychologist_id: row.psychologist_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

struct PatientRow {
    id: String,
    payment_plan: String,
    person_id: String,
    school_id: String,
    psychologist_id: Option<String>,
    created_at: String,
    updated_at: String,
}

fn patient_row(row: &Row<'_>) -> rusqlite::Result<PatientRow> {
    Ok(PatientRow {
        id: row.get(0)?,
        payment_plan: row.get(1)?,
        person_id: row.get(2)?,
        school_id: row.get(3)?,
        psychologist_id: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
