//! Psychologist and agenda models.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::validation::{require, ValidationError};

/// A psychologist who owns agendas and attends patients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Psychologist {
    pub id: String,
    pub name: String,
    /// Professional licence number (CRP), unique
    pub license_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PsychologistPayload {
    pub name: String,
    pub license_number: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Psychologist {
    pub fn from_payload(payload: &PsychologistPayload) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: payload.name.trim().to_string(),
            license_number: payload.license_number.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone: payload.phone.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl PsychologistPayload {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")?;
        require(&self.license_number, "licenseNumber")?;
        require(&self.email, "email")
    }
}

/// One available time window. Times are compared as given (e.g. "09:00").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_time: String,
    pub end_time: String,
}

impl TimeWindow {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// The windows a psychologist offers on one weekday.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayAgenda {
    pub day: Weekday,
    #[serde(default)]
    pub available_times: Vec<TimeWindow>,
}

/// A psychologist's agenda.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agenda {
    pub id: String,
    pub psychologist_id: String,
    pub days: Vec<DayAgenda>,
    pub created_at: String,
    pub updated_at: String,
}

impl Agenda {
    pub fn new(psychologist_id: String, days: Vec<DayAgenda>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            psychologist_id,
            days,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Agenda create payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgendaRequest {
    pub psychologist_id: String,
    pub agendas: Vec<DayAgenda>,
}

/// Agenda update payload (replaces every day entry).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateAgendaRequest {
    pub agendas: Vec<DayAgenda>,
}
