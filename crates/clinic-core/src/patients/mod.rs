//! Patient workflows: onboarding, maintenance and removal.

mod onboarding;

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    ComorbidityPayload, Medicine, MedicinePayload, Patient, SchoolPayload, UpdatePatientRequest,
};
use crate::storage::BlobStore;

/// A blob that could not be deleted after its document row was removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanupFailure {
    pub public_id: String,
    pub error: String,
}

/// Outcome of removing a patient.
///
/// The database side is all-or-nothing; blob cleanup runs after commit and
/// its failures are listed here instead of failing the call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemovalReport {
    pub patient_id: String,
    pub documents_removed: usize,
    pub cleanup_failures: Vec<CleanupFailure>,
}

impl RemovalReport {
    pub fn is_clean(&self) -> bool {
        self.cleanup_failures.is_empty()
    }
}

/// Patient operations over a database and the blob store holding the
/// patients' documents.
pub struct PatientService<'a> {
    db: &'a Database,
    blobs: &'a dyn BlobStore,
}

impl<'a> PatientService<'a> {
    pub fn new(db: &'a Database, blobs: &'a dyn BlobStore) -> Self {
        Self { db, blobs }
    }

    pub fn find_all(&self) -> ServiceResult<Vec<Patient>> {
        Ok(self.db.list_patients()?)
    }

    pub fn find_one(&self, id: &str) -> ServiceResult<Patient> {
        load(self.db, id)
    }

    /// Apply a partial update and return the refreshed patient.
    pub fn update(&self, id: &str, request: &UpdatePatientRequest) -> ServiceResult<Patient> {
        request.validate()?;

        self.db.with_transaction(|db| -> ServiceResult<()> {
            let mut patient = load(db, id)?;
            if let Some(plan) = request.payment_plan {
                patient.payment_plan = plan;
            }
            if let Some(psychologist_id) = &request.psychologist_id {
                if db.get_psychologist(psychologist_id)?.is_none() {
                    return Err(ServiceError::NotFound(format!("psychologist {psychologist_id}")));
                }
                patient.psychologist_id = Some(psychologist_id.clone());
            }
            if let Some(person) = &request.person {
                patient.person.apply(person);
                db.update_person(&patient.person)?;
            }
            db.update_patient(&patient)?;
            Ok(())
        })?;

        tracing::debug!(patient_id = %id, "patient updated");
        self.find_one(id)
    }

    /// Move the patient to the school named in `payload`, creating it if no
    /// school has that name yet.
    pub fn update_school(&self, id: &str, payload: &SchoolPayload) -> ServiceResult<Patient> {
        payload.validate()?;

        self.db.with_transaction(|db| -> ServiceResult<()> {
            let mut patient = load(db, id)?;
            let resolved = db.find_or_create_school(payload)?;
            tracing::debug!(
                patient_id = %id,
                created = resolved.was_created(),
                "school resolved for update"
            );
            patient.school = resolved.into_inner();
            db.update_patient(&patient)?;
            Ok(())
        })?;

        self.find_one(id)
    }

    /// Link comorbidities by name. Links that already exist are ignored.
    pub fn add_comorbidities(
        &self,
        id: &str,
        payloads: &[ComorbidityPayload],
    ) -> ServiceResult<Patient> {
        for (i, payload) in payloads.iter().enumerate() {
            payload.validate(&format!("comorbidities[{i}]"))?;
        }

        self.db.with_transaction(|db| -> ServiceResult<()> {
            ensure_patient(db, id)?;
            for payload in payloads {
                let comorbidity = db.find_or_create_comorbidity(payload.name.trim())?.into_inner();
                db.link_comorbidity(id, &comorbidity.id)?;
            }
            Ok(())
        })?;

        self.find_one(id)
    }

    /// Add medicines to a patient.
    pub fn add_medicines(&self, id: &str, payloads: &[MedicinePayload]) -> ServiceResult<Patient> {
        for (i, payload) in payloads.iter().enumerate() {
            payload.validate(&format!("medicines[{i}]"))?;
        }

        self.db.with_transaction(|db| -> ServiceResult<()> {
            ensure_patient(db, id)?;
            for payload in payloads {
                db.insert_medicine(&Medicine::new(id.to_string(), payload))?;
            }
            Ok(())
        })?;

        self.find_one(id)
    }

    /// Remove one of the patient's medicines.
    pub fn remove_medicine(&self, patient_id: &str, medicine_id: &str) -> ServiceResult<()> {
        if !self.db.delete_medicine(patient_id, medicine_id)? {
            return Err(ServiceError::NotFound(format!(
                "medicine {medicine_id} of patient {patient_id}"
            )));
        }
        Ok(())
    }

    /// Remove a patient with their medicines, documents and own person
    /// record. Shared school, comorbidity and parent records stay.
    pub fn remove(&self, id: &str) -> ServiceResult<RemovalReport> {
        let documents = self.db.with_transaction(|db| {
            let patient = load(db, id)?;
            let documents = db.list_documents_for_patient(id)?;
            db.delete_documents_for_patient(id)?;
            db.delete_patient(id)?;
            if !db.delete_person_if_unlinked(&patient.person.id)? {
                tracing::debug!(person_id = %patient.person.id, "person kept, still a parent");
            }
            Ok::<_, ServiceError>(documents)
        })?;

        let mut report = RemovalReport {
            patient_id: id.to_string(),
            documents_removed: documents.len(),
            cleanup_failures: Vec::new(),
        };
        for document in &documents {
            if let Err(e) = self.blobs.delete(&document.public_id) {
                tracing::warn!(
                    patient_id = %id,
                    public_id = %document.public_id,
                    error = %e,
                    "failed to delete document blob"
                );
                report.cleanup_failures.push(CleanupFailure {
                    public_id: document.public_id.clone(),
                    error: e.to_string(),
                });
            }
        }

        tracing::info!(
            patient_id = %id,
            documents = report.documents_removed,
            cleanup_failures = report.cleanup_failures.len(),
            "patient removed"
        );
        Ok(report)
    }
}

fn load(db: &Database, id: &str) -> ServiceResult<Patient> {
    db.get_patient(id)?
        .ok_or_else(|| ServiceError::NotFound(format!("patient {id}")))
}

fn ensure_patient(db: &Database, id: &str) -> ServiceResult<()> {
    load(db, id).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Address, CreatePatientRequest, Document, PaymentPlan, PersonPayload, PersonUpdate,
        Psychologist, PsychologistPayload,
    };
    use crate::storage::{MemoryBlobStore, UploadFile};

    fn person(name: &str, national_id: &str) -> PersonPayload {
        PersonPayload {
            name: name.into(),
            birthdate: "2013-11-20".into(),
            national_id: national_id.into(),
            rg: None,
            phone: "555-0101".into(),
            address: Address::default(),
        }
    }

    fn school(name: &str) -> SchoolPayload {
        SchoolPayload {
            name: name.into(),
            tax_id: "12.345.678/0001-90".into(),
            phone: None,
            address: Address::default(),
        }
    }

    fn request(national_id: &str, parents: Vec<PersonPayload>) -> CreatePatientRequest {
        CreatePatientRequest {
            payment_plan: PaymentPlan::Bimonthly,
            person: person("Beatriz", national_id),
            school: school("Escola Sol"),
            comorbidities: Vec::new(),
            medicines: Vec::new(),
            parents,
            psychologist_id: None,
        }
    }

    #[test]
    fn test_update_fields() {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        let service = PatientService::new(&db, &blobs);
        let patient = service.create(&request("1", vec![])).unwrap();

        let psychologist = Psychologist::from_payload(&PsychologistPayload {
            name: "Dr. Prado".into(),
            license_number: "CRP-5".into(),
            email: "prado@example.com".into(),
            phone: None,
        });
        db.insert_psychologist(&psychologist).unwrap();

        let updated = service
            .update(
                &patient.id,
                &UpdatePatientRequest {
                    payment_plan: Some(PaymentPlan::Quarterly),
                    psychologist_id: Some(psychologist.id.clone()),
                    person: Some(PersonUpdate {
                        phone: Some("555-0202".into()),
                        ..Default::default()
                    }),
                },
            )
            .unwrap();

        assert_eq!(updated.payment_plan, PaymentPlan::Quarterly);
        assert_eq!(updated.psychologist_id, Some(psychologist.id));
        assert_eq!(updated.person.phone, "555-0202");
        assert_eq!(updated.person.name, "Beatriz");
    }

    #[test]
    fn test_update_unknown_psychologist_keeps_patient() {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        let service = PatientService::new(&db, &blobs);
        let patient = service.create(&request("1", vec![])).unwrap();

        let result = service.update(
            &patient.id,
            &UpdatePatientRequest {
                payment_plan: Some(PaymentPlan::Quarterly),
                psychologist_id: Some("ghost".into()),
                person: None,
            },
        );
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(service.find_one(&patient.id).unwrap().payment_plan, PaymentPlan::Bimonthly);
    }

    #[test]
    fn test_update_school_reuses_or_creates() {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        let service = PatientService::new(&db, &blobs);
        let first = service.create(&request("1", vec![])).unwrap();
        let second = service.create(&request("2", vec![])).unwrap();

        let moved = service.update_school(&first.id, &school("Escola Lua")).unwrap();
        assert_eq!(moved.school.name, "Escola Lua");
        assert_eq!(db.count_rows("schools").unwrap(), 2);

        let back = service.update_school(&first.id, &school("Escola Sol")).unwrap();
        assert_eq!(back.school.id, second.school.id);
        assert_eq!(db.count_rows("schools").unwrap(), 2);
    }

    #[test]
    fn test_add_comorbidities_and_medicines() {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        let service = PatientService::new(&db, &blobs);
        let patient = service.create(&request("1", vec![])).unwrap();

        let names = [ComorbidityPayload { name: "Dyslexia".into() }, ComorbidityPayload { name: "ASD".into() }];
        service.add_comorbidities(&patient.id, &names).unwrap();
        let patient = service.add_comorbidities(&patient.id, &names[..1]).unwrap();
        assert_eq!(patient.comorbidities.len(), 2);

        let patient = service
            .add_medicines(
                &patient.id,
                &[MedicinePayload {
                    name: "Risperidone".into(),
                    dosage: "0.5mg".into(),
                    frequency: "nightly".into(),
                    notes: Some("with food".into()),
                }],
            )
            .unwrap();
        assert_eq!(patient.medicines.len(), 1);

        let medicine_id = patient.medicines[0].id.clone();
        assert!(matches!(
            service.remove_medicine("other", &medicine_id),
            Err(ServiceError::NotFound(_))
        ));
        service.remove_medicine(&patient.id, &medicine_id).unwrap();
        assert!(service.find_one(&patient.id).unwrap().medicines.is_empty());
    }

    #[test]
    fn test_add_to_missing_patient() {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        let result = PatientService::new(&db, &blobs)
            .add_comorbidities("ghost", &[ComorbidityPayload { name: "ASD".into() }]);
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(db.count_rows("comorbidities").unwrap(), 0);
    }

    #[test]
    fn test_remove_cleans_documents_and_keeps_shared() {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        let service = PatientService::new(&db, &blobs);
        let mut onboarding = request("1", vec![person("Carla", "50")]);
        onboarding.comorbidities = vec![ComorbidityPayload { name: "ADHD".into() }];
        onboarding.medicines = vec![MedicinePayload {
            name: "Methylphenidate".into(),
            dosage: "10mg".into(),
            frequency: "mornings".into(),
            notes: None,
        }];
        let patient = service.create(&onboarding).unwrap();
        assert_eq!(patient.name(), "Beatriz");
        assert_eq!(db.count_rows("medicines").unwrap(), 1);

        let blob = blobs.upload(&UploadFile::new("report.pdf", b"%PDF".to_vec())).unwrap();
        db.insert_document(&Document::new(patient.id.clone(), "Report".into(), blob.clone()))
            .unwrap();

        let report = service.remove(&patient.id).unwrap();
        assert_eq!(report.documents_removed, 1);
        assert!(report.is_clean());
        assert!(!blobs.contains(&blob.public_id));

        assert_eq!(db.count_rows("patients").unwrap(), 0);
        assert_eq!(db.count_rows("documents").unwrap(), 0);
        assert_eq!(db.count_rows("schools").unwrap(), 1);
        assert_eq!(db.count_rows("medicines").unwrap(), 0);
        assert_eq!(db.count_rows("patient_comorbidities").unwrap(), 0);
        assert_eq!(db.count_rows("comorbidities").unwrap(), 1);
        // Parent stays, own person goes
        assert_eq!(db.count_rows("persons").unwrap(), 1);
        assert!(db.find_person_by_national_id("50").unwrap().is_some());
    }

    #[test]
    fn test_remove_keeps_person_who_is_a_parent() {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        let service = PatientService::new(&db, &blobs);

        // An older sibling's record is reused as the parent of another patient
        let sibling = service.create(&request("10", vec![])).unwrap();
        service.create(&request("11", vec![person("Sibling", "10")])).unwrap();

        service.remove(&sibling.id).unwrap();
        assert!(db.find_person_by_national_id("10").unwrap().is_some());
    }

    #[test]
    fn test_remove_missing_patient() {
        let db = Database::open_in_memory().unwrap();
        let blobs = MemoryBlobStore::new();
        assert!(matches!(
            PatientService::new(&db, &blobs).remove("ghost"),
            Err(ServiceError::NotFound(_))
        ));
    }
}
