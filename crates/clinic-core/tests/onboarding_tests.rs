//! Patient onboarding integration tests.

use clinic_core::db::Database;
use clinic_core::models::{
    Address, ComorbidityPayload, CreatePatientRequest, MedicinePayload, PaymentPlan,
    PersonPayload, SchoolPayload,
};
use clinic_core::storage::MemoryBlobStore;
use clinic_core::{PatientService, ServiceError};
use proptest::prelude::*;

const CREATED_TABLES: &[&str] = &[
    "persons",
    "schools",
    "comorbidities",
    "patients",
    "patient_comorbidities",
    "patient_parents",
    "medicines",
];

fn person(name: &str, national_id: &str) -> PersonPayload {
    PersonPayload {
        name: name.to_string(),
        birthdate: "2014-09-12".to_string(),
        national_id: national_id.to_string(),
        rg: None,
        phone: "+55 21 4000-0000".to_string(),
        address: Address {
            zip_code: "20000-000".to_string(),
            state: "RJ".to_string(),
            city: "Rio de Janeiro".to_string(),
            street: "Rua das Flores".to_string(),
            district: "Centro".to_string(),
            home_number: 42,
            complement: None,
        },
    }
}

fn school(name: &str) -> SchoolPayload {
    SchoolPayload {
        name: name.to_string(),
        tax_id: "33.000.167/0001-01".to_string(),
        phone: None,
        address: Address::default(),
    }
}

fn make_request(national_id: &str, school_name: &str, comorbidities: &[&str]) -> CreatePatientRequest {
    CreatePatientRequest {
        payment_plan: PaymentPlan::Monthly,
        person: person("Patient", national_id),
        school: school(school_name),
        comorbidities: comorbidities
            .iter()
            .map(|name| ComorbidityPayload { name: name.to_string() })
            .collect(),
        medicines: vec![MedicinePayload {
            name: "Fluoxetine".to_string(),
            dosage: "10mg".to_string(),
            frequency: "daily".to_string(),
            notes: None,
        }],
        parents: vec![person("Parent", &format!("{national_id}-parent"))],
        psychologist_id: None,
    }
}

fn table_counts(db: &Database) -> Vec<i64> {
    CREATED_TABLES
        .iter()
        .map(|table| db.count_rows(table).unwrap())
        .collect()
}

#[test]
fn test_school_reused_across_patients() {
    let db = Database::open_in_memory().unwrap();
    let blobs = MemoryBlobStore::new();
    let service = PatientService::new(&db, &blobs);

    let first = service.create(&make_request("1", "Escola Ativa", &[])).unwrap();
    let second = service.create(&make_request("2", "Escola Ativa", &[])).unwrap();

    assert_eq!(first.school.id, second.school.id);
    assert_eq!(db.count_rows("schools").unwrap(), 1);
}

#[test]
fn test_comorbidity_reused_across_patients() {
    let db = Database::open_in_memory().unwrap();
    let blobs = MemoryBlobStore::new();
    let service = PatientService::new(&db, &blobs);

    let first = service.create(&make_request("1", "A", &["ADHD"])).unwrap();
    let second = service.create(&make_request("2", "B", &["ADHD", "ASD"])).unwrap();

    assert_eq!(first.comorbidities[0].id, second.comorbidities[0].id);
    assert_eq!(db.count_rows("comorbidities").unwrap(), 2);
}

#[test]
fn test_parent_reused_by_national_id() {
    let db = Database::open_in_memory().unwrap();
    let blobs = MemoryBlobStore::new();
    let service = PatientService::new(&db, &blobs);

    // Siblings share a parent
    let mut older = make_request("1", "A", &[]);
    older.parents = vec![person("Mother", "777")];
    let mut younger = make_request("2", "A", &[]);
    younger.parents = vec![person("Mother (again)", "777")];

    let older = service.create(&older).unwrap();
    let younger = service.create(&younger).unwrap();

    assert_eq!(older.parents[0].id, younger.parents[0].id);
    // Existing record is returned unchanged
    assert_eq!(younger.parents[0].name, "Mother");
}

#[test]
fn test_missing_psychologist_rolls_back_everything() {
    let db = Database::open_in_memory().unwrap();
    let blobs = MemoryBlobStore::new();
    let service = PatientService::new(&db, &blobs);

    let mut request = make_request("1", "Escola Nova", &["Dyslexia"]);
    request.psychologist_id = Some("no-such-psychologist".to_string());

    let err = service.create(&request).unwrap_err();
    match &err {
        ServiceError::Onboarding(cause) => {
            assert!(matches!(**cause, ServiceError::NotFound(_)));
        }
        other => panic!("expected onboarding failure, got {other:?}"),
    }

    // School, person, parent and comorbidity were written before the check
    for (table, count) in CREATED_TABLES.iter().zip(table_counts(&db)) {
        assert_eq!(count, 0, "{table} kept rows after rollback");
    }
}

#[test]
fn test_rollback_keeps_previously_committed_records() {
    let db = Database::open_in_memory().unwrap();
    let blobs = MemoryBlobStore::new();
    let service = PatientService::new(&db, &blobs);
    service.create(&make_request("1", "Escola", &["ADHD"])).unwrap();
    let before = table_counts(&db);

    let mut request = make_request("2", "Escola", &["ADHD", "OCD"]);
    request.psychologist_id = Some("ghost".to_string());
    assert!(service.create(&request).is_err());

    assert_eq!(table_counts(&db), before);
}

#[test]
fn test_onboarded_patient_is_fully_loaded() {
    let db = Database::open_in_memory().unwrap();
    let blobs = MemoryBlobStore::new();
    let service = PatientService::new(&db, &blobs);

    let created = service
        .create(&make_request("1", "Escola", &["ADHD", "ASD"]))
        .unwrap();
    let loaded = service.find_one(&created.id).unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.person.address.home_number, 42);
    assert_eq!(service.find_all().unwrap().len(), 1);
}

fn request_strategy() -> impl Strategy<Value = (Vec<String>, usize, usize)> {
    (
        proptest::collection::vec("[A-Z][a-z]{2,8}", 0..5),
        0usize..4,
        0usize..4,
    )
}

fn build(national_id: &str, comorbidities: &[String], medicines: usize, parents: usize) -> CreatePatientRequest {
    CreatePatientRequest {
        payment_plan: PaymentPlan::Quarterly,
        person: person("Patient", national_id),
        school: school("Escola Prop"),
        comorbidities: comorbidities
            .iter()
            .map(|name| ComorbidityPayload { name: name.clone() })
            .collect(),
        medicines: (0..medicines)
            .map(|i| MedicinePayload {
                name: format!("Medicine {i}"),
                dosage: String::new(),
                frequency: String::new(),
                notes: None,
            })
            .collect(),
        parents: (0..parents)
            .map(|i| person("Parent", &format!("{national_id}-p{i}")))
            .collect(),
        psychologist_id: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_counts_match_payload((comorbidities, medicines, parents) in request_strategy()) {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        let service = PatientService::new(&db, &blobs);

        let patient = service.create(&build("100", &comorbidities, medicines, parents)).unwrap();

        let mut distinct = comorbidities.clone();
        distinct.sort();
        distinct.dedup();

        prop_assert_eq!(patient.medicines.len(), medicines);
        prop_assert_eq!(patient.parents.len(), parents);
        prop_assert_eq!(patient.comorbidities.len(), distinct.len());
        prop_assert_eq!(db.count_rows("persons").unwrap(), 1 + parents as i64);
        prop_assert_eq!(db.count_rows("schools").unwrap(), 1);
    }

    #[test]
    fn prop_failed_onboarding_leaves_no_rows((comorbidities, medicines, parents) in request_strategy()) {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        let service = PatientService::new(&db, &blobs);

        let mut request = build("100", &comorbidities, medicines, parents);
        request.psychologist_id = Some("ghost".to_string());
        prop_assert!(service.create(&request).is_err());

        for count in table_counts(&db) {
            prop_assert_eq!(count, 0);
        }
    }

    #[test]
    fn prop_second_onboarding_reuses_shared_records((comorbidities, medicines, parents) in request_strategy()) {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        let service = PatientService::new(&db, &blobs);

        let first = service.create(&build("100", &comorbidities, medicines, parents)).unwrap();
        let comorbidity_rows = db.count_rows("comorbidities").unwrap();
        let second = service.create(&build("200", &comorbidities, medicines, parents)).unwrap();

        prop_assert_eq!(&first.school.id, &second.school.id);
        prop_assert_eq!(db.count_rows("schools").unwrap(), 1);
        prop_assert_eq!(db.count_rows("comorbidities").unwrap(), comorbidity_rows);
    }
}
