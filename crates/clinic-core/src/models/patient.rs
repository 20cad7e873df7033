//! Patient models and the composite onboarding request.

use serde::{Deserialize, Serialize};

use super::{
    Comorbidity, ComorbidityPayload, Medicine, MedicinePayload, Person, PersonPayload,
    PersonUpdate, School, SchoolPayload,
};
use crate::validation::{require, ValidationError};

/// How a patient pays for sessions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPlan {
    Monthly,
    Bimonthly,
    Quarterly,
}

impl PaymentPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentPlan::Monthly => "monthly",
            PaymentPlan::Bimonthly => "bimonthly",
            PaymentPlan::Quarterly => "quarterly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(PaymentPlan::Monthly),
            "bimonthly" => Some(PaymentPlan::Bimonthly),
            "quarterly" => Some(PaymentPlan::Quarterly),
            _ => None,
        }
    }
}

/// A fully linked patient record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: String,
    pub payment_plan: PaymentPlan,
    /// The patient's own person record (owned)
    pub person: Person,
    /// Shared school record
    pub school: School,
    /// Shared comorbidity records
    pub comorbidities: Vec<Comorbidity>,
    /// Owned medicine records
    pub medicines: Vec<Medicine>,
    /// Parent person records (shared, reused by national id)
    pub parents: Vec<Person>,
    /// Attending psychologist
    pub psychologist_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Patient {
    /// Assemble a new patient around already-resolved person and school.
    pub fn new(payment_plan: PaymentPlan, person: Person, school: School) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            payment_plan,
            person,
            school,
            comorbidities: Vec::new(),
            medicines: Vec::new(),
            parents: Vec::new(),
            psychologist_id: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Display name (the person's name).
    pub fn name(&self) -> &str {
        &self.person.name
    }
}

/// Composite payload accepted by patient onboarding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub payment_plan: PaymentPlan,
    pub person: PersonPayload,
    pub school: SchoolPayload,
    #[serde(default)]
    pub comorbidities: Vec<ComorbidityPayload>,
    #[serde(default)]
    pub medicines: Vec<MedicinePayload>,
    #[serde(default)]
    pub parents: Vec<PersonPayload>,
    #[serde(default)]
    pub psychologist_id: Option<String>,
}

impl CreatePatientRequest {
    /// Check every nested payload; the first problem wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.person.validate("person")?;
        self.school.validate()?;
        for (i, comorbidity) in self.comorbidities.iter().enumerate() {
            comorbidity.validate(&format!("comorbidities[{i}]"))?;
        }
        for (i, medicine) in self.medicines.iter().enumerate() {
            medicine.validate(&format!("medicines[{i}]"))?;
        }
        for (i, parent) in self.parents.iter().enumerate() {
            parent.validate(&format!("parents[{i}]"))?;
        }
        if let Some(psychologist_id) = &self.psychologist_id {
            require(psychologist_id, "psychologistId")?;
        }
        Ok(())
    }
}

/// Partial patient update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub payment_plan: Option<PaymentPlan>,
    pub psychologist_id: Option<String>,
    pub person: Option<PersonUpdate>,
}

impl UpdatePatientRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(psychologist_id) = &self.psychologist_id {
            require(psychologist_id, "psychologistId")?;
        }
        match &self.person {
            Some(person) => person.validate(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "paymentPlan": "bimonthly",
        "school": {"name": "ativa idade", "taxId": "00.000.0000/0001-00"},
        "person": {"name": "Caio", "birthdate": "2000-01-01", "nationalId": "123.456.798-00",
                   "phone": "+1 123 4567890"},
        "comorbidities": [{"name": "ADHD"}],
        "medicines": [],
        "parents": []
    }"#;

    #[test]
    fn test_request_deserializes() {
        let request: CreatePatientRequest = serde_json::from_str(REQUEST).unwrap();
        assert_eq!(request.payment_plan, PaymentPlan::Bimonthly);
        assert_eq!(request.comorbidities.len(), 1);
        assert!(request.psychologist_id.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_validation_points_at_nested_field() {
        let mut request: CreatePatientRequest = serde_json::from_str(REQUEST).unwrap();
        request.comorbidities.push(ComorbidityPayload { name: "".into() });
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField {
                field: "comorbidities[1].name".into()
            })
        );
    }

    #[test]
    fn test_payment_plan_round_trip_str() {
        for plan in [
            PaymentPlan::Monthly,
            PaymentPlan::Bimonthly,
            PaymentPlan::Quarterly,
        ] {
            assert_eq!(PaymentPlan::parse(plan.as_str()), Some(plan));
        }
        assert_eq!(PaymentPlan::parse("weekly"), None);
    }
}
