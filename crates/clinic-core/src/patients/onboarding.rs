//! Patient onboarding.
//!
//! One request resolves every related record and links it to a new patient
//! inside a single transaction:
//!
//! ```text
//! validate ─► person (new) ─► school (find-or-create by name)
//!          ─► comorbidities (find-or-create by name)
//!          ─► parents (find-or-create by national id)
//!          ─► psychologist (must exist) ─► patient row ─► medicines
//! ```
//!
//! Any failure after the transaction opens rolls back everything the
//! attempt created and surfaces as [`ServiceError::Onboarding`].

use crate::db::{Database, Resolved};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Comorbidity, CreatePatientRequest, Medicine, Patient, Person};

use super::PatientService;

impl<'a> PatientService<'a> {
    /// Create a fully linked patient, or nothing at all.
    pub fn create(&self, request: &CreatePatientRequest) -> ServiceResult<Patient> {
        request.validate()?;

        let patient = self
            .db
            .with_transaction(|db| onboard(db, request))
            .map_err(|e| {
                tracing::warn!(error = %e, "patient onboarding rolled back");
                ServiceError::Onboarding(Box::new(e))
            })?;

        tracing::info!(
            patient_id = %patient.id,
            name = patient.name(),
            school_id = %patient.school.id,
            comorbidities = patient.comorbidities.len(),
            parents = patient.parents.len(),
            medicines = patient.medicines.len(),
            "patient onboarded"
        );
        Ok(patient)
    }
}

fn onboard(db: &Database, request: &CreatePatientRequest) -> ServiceResult<Patient> {
    // The patient's own person is never shared
    let person = Person::from_payload(&request.person);
    db.insert_person(&person)?;

    let school = settle(
        db.find_or_create_school(&request.school)?,
        "school",
        request.school.name.trim(),
    );

    let mut comorbidities: Vec<Comorbidity> = Vec::with_capacity(request.comorbidities.len());
    for payload in &request.comorbidities {
        let name = payload.name.trim();
        let comorbidity = settle(db.find_or_create_comorbidity(name)?, "comorbidity", name);
        if !comorbidities.iter().any(|c| c.id == comorbidity.id) {
            comorbidities.push(comorbidity);
        }
    }

    let mut parents: Vec<Person> = Vec::with_capacity(request.parents.len());
    for payload in &request.parents {
        let parent = settle(
            db.find_or_create_person(payload)?,
            "parent",
            payload.national_id.trim(),
        );
        if !parents.iter().any(|p| p.id == parent.id) {
            parents.push(parent);
        }
    }

    if let Some(psychologist_id) = &request.psychologist_id {
        if db.get_psychologist(psychologist_id)?.is_none() {
            return Err(ServiceError::NotFound(format!("psychologist {psychologist_id}")));
        }
    }

    let mut patient = Patient::new(request.payment_plan, person, school);
    patient.comorbidities = comorbidities;
    patient.parents = parents;
    patient.psychologist_id = request.psychologist_id.clone();
    db.insert_patient(&patient)?;

    for payload in &request.medicines {
        let medicine = Medicine::new(patient.id.clone(), payload);
        db.insert_medicine(&medicine)?;
        patient.medicines.push(medicine);
    }

    Ok(patient)
}

fn settle<T>(resolved: Resolved<T>, entity: &'static str, key: &str) -> T {
    if resolved.was_created() {
        tracing::debug!(entity, key, "created shared record");
    } else {
        tracing::debug!(entity, key, "reused shared record");
    }
    resolved.into_inner()
}
