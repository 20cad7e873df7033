//! Person and address models.
//!
//! A person is either the patient themself or one of their parents.

use serde::{Deserialize, Serialize};

use crate::validation::{require, require_date, ValidationError};

/// Postal address, stored as a JSON column on its owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub zip_code: String,
    pub state: String,
    pub city: String,
    pub street: String,
    pub district: String,
    pub home_number: u32,
    pub complement: Option<String>,
}

/// A persisted person.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    /// Generated UUID
    pub id: String,
    pub name: String,
    /// ISO date (YYYY-MM-DD)
    pub birthdate: String,
    /// National identifier, unique across all persons
    pub national_id: String,
    /// Secondary identity document
    pub rg: Option<String>,
    pub phone: String,
    pub address: Address,
    pub created_at: String,
    pub updated_at: String,
}

/// Inbound person data (patient or parent).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonPayload {
    pub name: String,
    pub birthdate: String,
    pub national_id: String,
    #[serde(default)]
    pub rg: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub address: Address,
}

/// Partial person update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub birthdate: Option<String>,
    pub rg: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
}

impl Person {
    /// Build a new person record from a payload.
    pub fn from_payload(payload: &PersonPayload) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: payload.name.trim().to_string(),
            birthdate: payload.birthdate.trim().to_string(),
            national_id: payload.national_id.trim().to_string(),
            rg: payload.rg.clone(),
            phone: payload.phone.clone(),
            address: payload.address.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, update: &PersonUpdate) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(birthdate) = &update.birthdate {
            self.birthdate = birthdate.trim().to_string();
        }
        if let Some(rg) = &update.rg {
            self.rg = Some(rg.clone());
        }
        if let Some(phone) = &update.phone {
            self.phone = phone.clone();
        }
        if let Some(address) = &update.address {
            self.address = address.clone();
        }
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl PersonPayload {
    /// Validate required fields; `field` prefixes the reported field names.
    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        require(&self.name, &format!("{field}.name"))?;
        require(&self.national_id, &format!("{field}.nationalId"))?;
        require_date(&self.birthdate, &format!("{field}.birthdate"))
    }
}

impl PersonUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require(name, "person.name")?;
        }
        if let Some(birthdate) = &self.birthdate {
            require_date(birthdate, "person.birthdate")?;
        }
        Ok(())
    }
}
