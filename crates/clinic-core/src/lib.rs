//! Clinic Core Library
//!
//! Administration backend for a psychology practice: patients with their
//! parents, schools, comorbidities and medications; psychologists with
//! weekly agendas; and uploaded patient documents.
//!
//! # Architecture
//!
//! ```text
//!             Host application (uniffi bindings)
//!                           │
//!                      ClinicCore
//!        ┌──────────────┬───┴──────────┬──────────────┐
//!        ▼              ▼              ▼              ▼
//!  PatientService  AgendaService  PsychologistSvc  DocumentService
//!   (onboarding)    (overlap check)                   │
//!        │              │              │              ├──► BlobStore
//!        └──────────────┴──────┬───────┴──────────────┘   (fs / memory)
//!                              ▼
//!                     Database (SQLite)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite persistence, find-or-create primitives and transactions
//! - [`models`]: Domain types and inbound payloads
//! - [`patients`]: Onboarding, maintenance and removal of patients
//! - [`agenda`]: Psychologists, agendas and the time-window overlap check
//! - [`documents`]: Document uploads backed by a [`storage::BlobStore`]
//! - [`storage`]: Blob store trait with filesystem and in-memory stores
//! - [`config`] / [`logging`]: Startup configuration and tracing setup

pub mod agenda;
pub mod config;
pub mod db;
pub mod documents;
pub mod error;
pub mod logging;
pub mod models;
pub mod patients;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use agenda::{validate_agendas, AgendaService, PsychologistService};
pub use config::{ClinicConfig, ConfigError};
pub use db::{Database, DbError, Resolved};
pub use documents::DocumentService;
pub use error::{ServiceError, ServiceResult};
pub use models::{
    Agenda, CreatePatientRequest, DayAgenda, Document, DocumentSummary, Patient, PaymentPlan,
    Psychologist, TimeWindow,
};
pub use patients::{CleanupFailure, PatientService, RemovalReport};
pub use storage::{BlobStore, FsBlobStore, MemoryBlobStore, StorageError, StoredBlob, UploadFile};
pub use validation::ValidationError;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use models::{
    Address, AgendaRequest, Comorbidity, ComorbidityPayload, Medicine, MedicinePayload, Person,
    PsychologistPayload, School, SchoolPayload, UpdateAgendaRequest, UpdatePatientRequest,
};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<DbError> for ClinicError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(what) => ClinicError::NotFound(what),
            other => ClinicError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ServiceError> for ClinicError {
    fn from(e: ServiceError) -> Self {
        // Classify by the underlying cause, report the full chain
        let message = e.to_string();
        match e.root_cause() {
            ServiceError::Validation(_) => ClinicError::InvalidInput(message),
            ServiceError::NotFound(_) => ClinicError::NotFound(message),
            ServiceError::Storage(_) => ClinicError::StorageError(message),
            _ => ClinicError::DatabaseError(message),
        }
    }
}

impl From<StorageError> for ClinicError {
    fn from(e: StorageError) -> Self {
        ClinicError::StorageError(e.to_string())
    }
}

impl From<ConfigError> for ClinicError {
    fn from(e: ConfigError) -> Self {
        ClinicError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for ClinicError {
    fn from(e: serde_json::Error) -> Self {
        ClinicError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a clinic with its database file and blob directory.
#[uniffi::export]
pub fn open_clinic(
    database_path: String,
    blob_dir: String,
    blob_base_url: String,
) -> Result<Arc<ClinicCore>, ClinicError> {
    let config = ClinicConfig::new(
        database_path.into(),
        blob_dir.into(),
        blob_base_url,
        config::DEFAULT_LOG_FILTER.to_string(),
    )?;
    Ok(Arc::new(ClinicCore::open(&config)?))
}

/// Open a clinic configured from `CLINIC_*` environment variables (and
/// `.env`), installing the log subscriber on the way.
#[uniffi::export]
pub fn open_clinic_from_env() -> Result<Arc<ClinicCore>, ClinicError> {
    let config = ClinicConfig::from_env()?;
    logging::init_logging(config.log_filter());
    Ok(Arc::new(ClinicCore::open(&config)?))
}

/// Create an in-memory clinic (for testing).
#[uniffi::export]
pub fn open_clinic_in_memory() -> Result<Arc<ClinicCore>, ClinicError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(ClinicCore::new(db, Arc::new(MemoryBlobStore::new()))))
}

/// Install the log subscriber. Returns false if one was already installed.
#[uniffi::export]
pub fn init_logging(default_filter: String) -> bool {
    logging::init_logging(&default_filter)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe clinic handle for FFI.
#[derive(uniffi::Object)]
pub struct ClinicCore {
    db: Arc<Mutex<Database>>,
    blobs: Arc<dyn BlobStore>,
}

impl ClinicCore {
    /// Wrap an opened database and a blob store.
    pub fn new(db: Database, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            blobs,
        }
    }

    /// Open the database and filesystem blob store named by `config`.
    pub fn open(config: &ClinicConfig) -> Result<Self, ClinicError> {
        let db = Database::open(config.database_path())?;
        let blobs = FsBlobStore::new(config.blob_dir(), config.blob_base_url())?;
        tracing::info!(
            database = %config.database_path().display(),
            blobs = %config.blob_dir().display(),
            "clinic opened"
        );
        Ok(Self::new(db, Arc::new(blobs)))
    }
}

#[uniffi::export]
impl ClinicCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Onboard a patient from a JSON `CreatePatientRequest`.
    pub fn create_patient(&self, request_json: String) -> Result<FfiPatient, ClinicError> {
        let request: CreatePatientRequest = serde_json::from_str(&request_json)?;
        let db = self.db.lock()?;
        let patient = PatientService::new(&db, self.blobs.as_ref()).create(&request)?;
        Ok(patient.into())
    }

    /// List all patients.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, ClinicError> {
        let db = self.db.lock()?;
        let patients = PatientService::new(&db, self.blobs.as_ref()).find_all()?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, ClinicError> {
        let db = self.db.lock()?;
        let patient = found(PatientService::new(&db, self.blobs.as_ref()).find_one(&id))?;
        Ok(patient.map(|p| p.into()))
    }

    /// Apply a JSON `UpdatePatientRequest`.
    pub fn update_patient(&self, id: String, request_json: String) -> Result<FfiPatient, ClinicError> {
        let request: UpdatePatientRequest = serde_json::from_str(&request_json)?;
        let db = self.db.lock()?;
        let patient = PatientService::new(&db, self.blobs.as_ref()).update(&id, &request)?;
        Ok(patient.into())
    }

    /// Move a patient to the school described by a JSON `SchoolPayload`.
    pub fn update_patient_school(
        &self,
        id: String,
        school_json: String,
    ) -> Result<FfiPatient, ClinicError> {
        let school: SchoolPayload = serde_json::from_str(&school_json)?;
        let db = self.db.lock()?;
        let patient = PatientService::new(&db, self.blobs.as_ref()).update_school(&id, &school)?;
        Ok(patient.into())
    }

    /// Link comorbidities by name.
    pub fn add_comorbidities(&self, id: String, names: Vec<String>) -> Result<FfiPatient, ClinicError> {
        let payloads: Vec<ComorbidityPayload> = names
            .into_iter()
            .map(|name| ComorbidityPayload { name })
            .collect();
        let db = self.db.lock()?;
        let patient = PatientService::new(&db, self.blobs.as_ref()).add_comorbidities(&id, &payloads)?;
        Ok(patient.into())
    }

    /// Add medicines from a JSON array of `MedicinePayload`.
    pub fn add_medicines(&self, id: String, medicines_json: String) -> Result<FfiPatient, ClinicError> {
        let payloads: Vec<MedicinePayload> = serde_json::from_str(&medicines_json)?;
        let db = self.db.lock()?;
        let patient = PatientService::new(&db, self.blobs.as_ref()).add_medicines(&id, &payloads)?;
        Ok(patient.into())
    }

    /// Remove one medicine from a patient.
    pub fn remove_medicine(&self, patient_id: String, medicine_id: String) -> Result<(), ClinicError> {
        let db = self.db.lock()?;
        PatientService::new(&db, self.blobs.as_ref()).remove_medicine(&patient_id, &medicine_id)?;
        Ok(())
    }

    /// Remove a patient and clean up their documents.
    pub fn remove_patient(&self, id: String) -> Result<FfiRemovalReport, ClinicError> {
        let db = self.db.lock()?;
        let report = PatientService::new(&db, self.blobs.as_ref()).remove(&id)?;
        Ok(report.into())
    }

    // =========================================================================
    // Psychologist Operations
    // =========================================================================

    /// Register a psychologist.
    pub fn create_psychologist(
        &self,
        name: String,
        license_number: String,
        email: String,
        phone: Option<String>,
    ) -> Result<FfiPsychologist, ClinicError> {
        let payload = PsychologistPayload {
            name,
            license_number,
            email,
            phone,
        };
        let db = self.db.lock()?;
        let psychologist = PsychologistService::new(&db).create(&payload)?;
        Ok(psychologist.into())
    }

    /// List psychologists by name.
    pub fn list_psychologists(&self) -> Result<Vec<FfiPsychologist>, ClinicError> {
        let db = self.db.lock()?;
        let psychologists = PsychologistService::new(&db).find_all()?;
        Ok(psychologists.into_iter().map(|p| p.into()).collect())
    }

    /// Get a psychologist by ID.
    pub fn get_psychologist(&self, id: String) -> Result<Option<FfiPsychologist>, ClinicError> {
        let db = self.db.lock()?;
        let psychologist = found(PsychologistService::new(&db).find_one(&id))?;
        Ok(psychologist.map(|p| p.into()))
    }

    /// Overwrite a psychologist's fields.
    pub fn update_psychologist(
        &self,
        id: String,
        name: String,
        license_number: String,
        email: String,
        phone: Option<String>,
    ) -> Result<FfiPsychologist, ClinicError> {
        let payload = PsychologistPayload {
            name,
            license_number,
            email,
            phone,
        };
        let db = self.db.lock()?;
        let psychologist = PsychologistService::new(&db).update(&id, &payload)?;
        Ok(psychologist.into())
    }

    /// Remove a psychologist and their agendas.
    pub fn remove_psychologist(&self, id: String) -> Result<(), ClinicError> {
        let db = self.db.lock()?;
        PsychologistService::new(&db).remove(&id)?;
        Ok(())
    }

    // =========================================================================
    // Agenda Operations
    // =========================================================================

    /// Create an agenda from a JSON `AgendaRequest`.
    pub fn create_agenda(&self, request_json: String) -> Result<FfiAgenda, ClinicError> {
        let request: AgendaRequest = serde_json::from_str(&request_json)?;
        let db = self.db.lock()?;
        let agenda = AgendaService::new(&db).create(&request)?;
        Ok(agenda.into())
    }

    /// List every agenda.
    pub fn list_agendas(&self) -> Result<Vec<FfiAgenda>, ClinicError> {
        let db = self.db.lock()?;
        let agendas = AgendaService::new(&db).find_all()?;
        Ok(agendas.into_iter().map(|a| a.into()).collect())
    }

    /// List a psychologist's agendas.
    pub fn list_agendas_for_psychologist(
        &self,
        psychologist_id: String,
    ) -> Result<Vec<FfiAgenda>, ClinicError> {
        let db = self.db.lock()?;
        let agendas = AgendaService::new(&db).find_all_for_psychologist(&psychologist_id)?;
        Ok(agendas.into_iter().map(|a| a.into()).collect())
    }

    /// Get an agenda by ID.
    pub fn get_agenda(&self, id: String) -> Result<Option<FfiAgenda>, ClinicError> {
        let db = self.db.lock()?;
        let agenda = found(AgendaService::new(&db).find_one(&id))?;
        Ok(agenda.map(|a| a.into()))
    }

    /// Replace an agenda's days from a JSON `UpdateAgendaRequest`.
    pub fn update_agenda(&self, id: String, request_json: String) -> Result<FfiAgenda, ClinicError> {
        let request: UpdateAgendaRequest = serde_json::from_str(&request_json)?;
        let db = self.db.lock()?;
        let agenda = AgendaService::new(&db).update(&id, &request)?;
        Ok(agenda.into())
    }

    /// Remove an agenda.
    pub fn remove_agenda(&self, id: String) -> Result<(), ClinicError> {
        let db = self.db.lock()?;
        AgendaService::new(&db).remove(&id)?;
        Ok(())
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Upload a document for a patient.
    pub fn upload_document(
        &self,
        patient_id: String,
        title: String,
        file: FfiUploadFile,
    ) -> Result<FfiDocument, ClinicError> {
        let file: UploadFile = file.into();
        let db = self.db.lock()?;
        let document = DocumentService::new(&db, self.blobs.as_ref()).create(&title, &patient_id, &file)?;
        Ok(document.into())
    }

    /// Upload a batch of follow-up documents, all or nothing.
    pub fn upload_follow_ups(
        &self,
        patient_id: String,
        files: Vec<FfiUploadFile>,
    ) -> Result<Vec<FfiDocument>, ClinicError> {
        let files: Vec<UploadFile> = files.into_iter().map(|f| f.into()).collect();
        let db = self.db.lock()?;
        let documents =
            DocumentService::new(&db, self.blobs.as_ref()).create_follow_ups(&patient_id, &files)?;
        Ok(documents.into_iter().map(|d| d.into()).collect())
    }

    /// List a patient's documents.
    pub fn list_documents_for_patient(&self, patient_id: String) -> Result<Vec<FfiDocument>, ClinicError> {
        let db = self.db.lock()?;
        let documents = DocumentService::new(&db, self.blobs.as_ref()).find_all_by_patient(&patient_id)?;
        Ok(documents.into_iter().map(|d| d.into()).collect())
    }

    /// List documents of a psychologist's patients.
    pub fn list_documents_for_psychologist(
        &self,
        psychologist_id: String,
    ) -> Result<Vec<FfiDocumentSummary>, ClinicError> {
        let db = self.db.lock()?;
        let documents =
            DocumentService::new(&db, self.blobs.as_ref()).find_all_by_psychologist(&psychologist_id)?;
        Ok(documents.into_iter().map(|d| d.into()).collect())
    }

    /// Get a document by ID.
    pub fn get_document(&self, id: String) -> Result<Option<FfiDocument>, ClinicError> {
        let db = self.db.lock()?;
        let document = found(DocumentService::new(&db, self.blobs.as_ref()).find_one(&id))?;
        Ok(document.map(|d| d.into()))
    }

    /// Change a document's title and/or file.
    pub fn update_document(
        &self,
        id: String,
        title: Option<String>,
        file: Option<FfiUploadFile>,
    ) -> Result<FfiDocument, ClinicError> {
        let file: Option<UploadFile> = file.map(|f| f.into());
        let db = self.db.lock()?;
        let document = DocumentService::new(&db, self.blobs.as_ref()).update(
            &id,
            title.as_deref(),
            file.as_ref(),
        )?;
        Ok(document.into())
    }

    /// Remove a document and its stored file.
    pub fn remove_document(&self, id: String) -> Result<(), ClinicError> {
        let db = self.db.lock()?;
        DocumentService::new(&db, self.blobs.as_ref()).remove(&id)?;
        Ok(())
    }
}

/// Turn a not-found outcome into `None`.
fn found<T>(result: ServiceResult<T>) -> Result<Option<T>, ClinicError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ServiceError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe address.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAddress {
    pub zip_code: String,
    pub state: String,
    pub city: String,
    pub street: String,
    pub district: String,
    pub home_number: u32,
    pub complement: Option<String>,
}

impl From<Address> for FfiAddress {
    fn from(address: Address) -> Self {
        Self {
            zip_code: address.zip_code,
            state: address.state,
            city: address.city,
            street: address.street,
            district: address.district,
            home_number: address.home_number,
            complement: address.complement,
        }
    }
}

/// FFI-safe person (patient or parent).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPerson {
    pub id: String,
    pub name: String,
    pub birthdate: String,
    pub national_id: String,
    pub rg: Option<String>,
    pub phone: String,
    pub address: FfiAddress,
}

impl From<Person> for FfiPerson {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            birthdate: person.birthdate,
            national_id: person.national_id,
            rg: person.rg,
            phone: person.phone,
            address: person.address.into(),
        }
    }
}

/// FFI-safe school.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSchool {
    pub id: String,
    pub name: String,
    pub tax_id: String,
    pub phone: Option<String>,
    pub address: FfiAddress,
}

impl From<School> for FfiSchool {
    fn from(school: School) -> Self {
        Self {
            id: school.id,
            name: school.name,
            tax_id: school.tax_id,
            phone: school.phone,
            address: school.address.into(),
        }
    }
}

/// FFI-safe comorbidity.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiComorbidity {
    pub id: String,
    pub name: String,
}

impl From<Comorbidity> for FfiComorbidity {
    fn from(comorbidity: Comorbidity) -> Self {
        Self {
            id: comorbidity.id,
            name: comorbidity.name,
        }
    }
}

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub notes: Option<String>,
}

impl From<Medicine> for FfiMedicine {
    fn from(medicine: Medicine) -> Self {
        Self {
            id: medicine.id,
            name: medicine.name,
            dosage: medicine.dosage,
            frequency: medicine.frequency,
            notes: medicine.notes,
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub payment_plan: String,
    pub person: FfiPerson,
    pub school: FfiSchool,
    pub comorbidities: Vec<FfiComorbidity>,
    pub medicines: Vec<FfiMedicine>,
    pub parents: Vec<FfiPerson>,
    pub psychologist_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            payment_plan: patient.payment_plan.as_str().to_string(),
            person: patient.person.into(),
            school: patient.school.into(),
            comorbidities: patient.comorbidities.into_iter().map(|c| c.into()).collect(),
            medicines: patient.medicines.into_iter().map(|m| m.into()).collect(),
            parents: patient.parents.into_iter().map(|p| p.into()).collect(),
            psychologist_id: patient.psychologist_id,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

/// FFI-safe psychologist.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPsychologist {
    pub id: String,
    pub name: String,
    pub license_number: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<Psychologist> for FfiPsychologist {
    fn from(psychologist: Psychologist) -> Self {
        Self {
            id: psychologist.id,
            name: psychologist.name,
            license_number: psychologist.license_number,
            email: psychologist.email,
            phone: psychologist.phone,
        }
    }
}

/// FFI-safe time window.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTimeWindow {
    pub start_time: String,
    pub end_time: String,
}

/// FFI-safe day agenda. `day` is the short weekday name ("Mon").
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDayAgenda {
    pub day: String,
    pub available_times: Vec<FfiTimeWindow>,
}

impl From<DayAgenda> for FfiDayAgenda {
    fn from(day: DayAgenda) -> Self {
        Self {
            day: day.day.to_string(),
            available_times: day
                .available_times
                .into_iter()
                .map(|w| FfiTimeWindow {
                    start_time: w.start_time,
                    end_time: w.end_time,
                })
                .collect(),
        }
    }
}

/// FFI-safe agenda.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAgenda {
    pub id: String,
    pub psychologist_id: String,
    pub days: Vec<FfiDayAgenda>,
    pub updated_at: String,
}

impl From<Agenda> for FfiAgenda {
    fn from(agenda: Agenda) -> Self {
        Self {
            id: agenda.id,
            psychologist_id: agenda.psychologist_id,
            days: agenda.days.into_iter().map(|d| d.into()).collect(),
            updated_at: agenda.updated_at,
        }
    }
}

/// FFI-safe file upload.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl From<FfiUploadFile> for UploadFile {
    fn from(file: FfiUploadFile) -> Self {
        UploadFile::new(file.file_name, file.bytes)
    }
}

/// FFI-safe document.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDocument {
    pub id: String,
    pub patient_id: String,
    pub title: String,
    pub doc_link: String,
    pub created_at: String,
}

impl From<Document> for FfiDocument {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            patient_id: document.patient_id,
            title: document.title,
            doc_link: document.doc_link,
            created_at: document.created_at,
        }
    }
}

/// FFI-safe document listing row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDocumentSummary {
    pub id: String,
    pub title: String,
    pub doc_link: String,
    pub patient_name: String,
}

impl From<DocumentSummary> for FfiDocumentSummary {
    fn from(summary: DocumentSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            doc_link: summary.doc_link,
            patient_name: summary.patient_name,
        }
    }
}

/// FFI-safe blob cleanup failure.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCleanupFailure {
    pub public_id: String,
    pub error: String,
}

/// FFI-safe removal report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRemovalReport {
    pub patient_id: String,
    pub documents_removed: u32,
    pub cleanup_failures: Vec<FfiCleanupFailure>,
}

impl From<RemovalReport> for FfiRemovalReport {
    fn from(report: RemovalReport) -> Self {
        Self {
            patient_id: report.patient_id,
            documents_removed: u32::try_from(report.documents_removed).unwrap_or(u32::MAX),
            cleanup_failures: report
                .cleanup_failures
                .into_iter()
                .map(|f| FfiCleanupFailure {
                    public_id: f.public_id,
                    error: f.error,
                })
                .collect(),
        }
    }
}
