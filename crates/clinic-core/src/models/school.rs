//! School, comorbidity and medicine models.
//!
//! Schools and comorbidities are shared across patients and reused by their
//! natural key; medicines belong to exactly one patient.

use serde::{Deserialize, Serialize};

use super::Address;
use crate::validation::{require, ValidationError};

/// A school, unique by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct School {
    pub id: String,
    pub name: String,
    /// Tax identifier (CNPJ)
    pub tax_id: String,
    pub phone: Option<String>,
    pub address: Address,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchoolPayload {
    pub name: String,
    pub tax_id: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
}

impl School {
    pub fn from_payload(payload: &SchoolPayload) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: payload.name.trim().to_string(),
            tax_id: payload.tax_id.trim().to_string(),
            phone: payload.phone.clone(),
            address: payload.address.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl SchoolPayload {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "school.name")?;
        require(&self.tax_id, "school.taxId")
    }
}

/// A comorbidity, unique by exact name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comorbidity {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComorbidityPayload {
    pub name: String,
}

impl Comorbidity {
    pub fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl ComorbidityPayload {
    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        require(&self.name, &format!("{field}.name"))
    }
}

/// Medication usage owned by a single patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    pub id: String,
    pub patient_id: String,
    pub name: String,
    pub dosage: String,
    /// How often it is taken (e.g. "every 8 hours")
    pub frequency: String,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicinePayload {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Medicine {
    pub fn new(patient_id: String, payload: &MedicinePayload) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            name: payload.name.trim().to_string(),
            dosage: payload.dosage.clone(),
            frequency: payload.frequency.clone(),
            notes: payload.notes.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl MedicinePayload {
    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        require(&self.name, &format!("{field}.name"))
    }
}
