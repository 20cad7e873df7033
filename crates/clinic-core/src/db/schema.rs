//! SQLite schema definition.

/// Tables created by [`SCHEMA`].
pub const TABLES: &[&str] = &[
    "persons",
    "schools",
    "comorbidities",
    "psychologists",
    "patients",
    "patient_comorbidities",
    "patient_parents",
    "medicines",
    "documents",
    "agendas",
    "agenda_days",
];

/// Complete database schema for the clinic.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Shared records (reused by natural key)
-- ============================================================================

CREATE TABLE IF NOT EXISTS persons (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    birthdate TEXT NOT NULL,
    national_id TEXT NOT NULL UNIQUE,
    rg TEXT,
    phone TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '{}',          -- JSON Address
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS schools (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    tax_id TEXT NOT NULL,
    phone TEXT,
    address TEXT NOT NULL DEFAULT '{}',          -- JSON Address
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS comorbidities (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Psychologists
-- ============================================================================

CREATE TABLE IF NOT EXISTS psychologists (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    license_number TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    phone TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    payment_plan TEXT NOT NULL,
    person_id TEXT NOT NULL UNIQUE REFERENCES persons(id),
    school_id TEXT NOT NULL REFERENCES schools(id),
    psychologist_id TEXT REFERENCES psychologists(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_school ON patients(school_id);
CREATE INDEX IF NOT EXISTS idx_patients_psychologist ON patients(psychologist_id);

CREATE TABLE IF NOT EXISTS patient_comorbidities (
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    comorbidity_id TEXT NOT NULL REFERENCES comorbidities(id),
    position INTEGER NOT NULL,
    PRIMARY KEY (patient_id, comorbidity_id)
);

CREATE TABLE IF NOT EXISTS patient_parents (
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    parent_id TEXT NOT NULL REFERENCES persons(id),
    position INTEGER NOT NULL,
    PRIMARY KEY (patient_id, parent_id)
);

CREATE INDEX IF NOT EXISTS idx_patient_parents_parent ON patient_parents(parent_id);

-- Medicines cannot outlive their patient
CREATE TABLE IF NOT EXISTS medicines (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    dosage TEXT NOT NULL DEFAULT '',
    frequency TEXT NOT NULL DEFAULT '',
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_patient ON medicines(patient_id);

-- ============================================================================
-- Documents (no cascade: rows are removed explicitly so blobs can be cleaned)
-- ============================================================================

CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL REFERENCES patients(id),
    title TEXT NOT NULL,
    doc_link TEXT NOT NULL,
    public_id TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_documents_patient ON documents(patient_id);

-- ============================================================================
-- Agendas
-- ============================================================================

CREATE TABLE IF NOT EXISTS agendas (
    id TEXT PRIMARY KEY,
    psychologist_id TEXT NOT NULL REFERENCES psychologists(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_agendas_psychologist ON agendas(psychologist_id);

CREATE TABLE IF NOT EXISTS agenda_days (
    agenda_id TEXT NOT NULL REFERENCES agendas(id) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    day TEXT NOT NULL,                            -- Mon, Tue, ...
    available_times TEXT NOT NULL DEFAULT '[]',   -- JSON array of TimeWindow
    PRIMARY KEY (agenda_id, position)
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_medicines_cascade_with_patient() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute_batch(
            r#"
            INSERT INTO persons (id, name, birthdate, national_id) VALUES ('p1', 'Ana', '2014-01-01', '111');
            INSERT INTO schools (id, name, tax_id) VALUES ('s1', 'Escola', '00');
            INSERT INTO patients (id, payment_plan, person_id, school_id) VALUES ('pt1', 'monthly', 'p1', 's1');
            INSERT INTO medicines (id, patient_id, name) VALUES ('m1', 'pt1', 'Ritalin');
            "#,
        )
        .unwrap();

        conn.execute("DELETE FROM patients WHERE id = 'pt1'", []).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM medicines", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_school_name_unique() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute("INSERT INTO schools (id, name, tax_id) VALUES ('s1', 'Escola', '00')", [])
            .unwrap();
        let result = conn.execute(
            "INSERT INTO schools (id, name, tax_id) VALUES ('s2', 'Escola', '01')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_patient_requires_existing_psychologist() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute_batch(
            r#"
            INSERT INTO persons (id, name, birthdate, national_id) VALUES ('p1', 'Ana', '2014-01-01', '111');
            INSERT INTO schools (id, name, tax_id) VALUES ('s1', 'Escola', '00');
            "#,
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO patients (id, payment_plan, person_id, school_id, psychologist_id) VALUES ('pt1', 'monthly', 'p1', 's1', 'nope')",
            [],
        );
        assert!(result.is_err());
    }
}
