//! Psychologist maintenance.

use crate::db::Database;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Psychologist, PsychologistPayload};

/// Psychologist CRUD.
pub struct PsychologistService<'a> {
    db: &'a Database,
}

impl<'a> PsychologistService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn create(&self, payload: &PsychologistPayload) -> ServiceResult<Psychologist> {
        payload.validate()?;
        let psychologist = Psychologist::from_payload(payload);
        self.db.insert_psychologist(&psychologist)?;
        tracing::info!(psychologist_id = %psychologist.id, "psychologist created");
        Ok(psychologist)
    }

    pub fn find_all(&self) -> ServiceResult<Vec<Psychologist>> {
        Ok(self.db.list_psychologists()?)
    }

    pub fn find_one(&self, id: &str) -> ServiceResult<Psychologist> {
        self.db
            .get_psychologist(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("psychologist {id}")))
    }

    /// Overwrite every field from the payload.
    pub fn update(&self, id: &str, payload: &PsychologistPayload) -> ServiceResult<Psychologist> {
        payload.validate()?;
        let mut psychologist = self.find_one(id)?;
        let fields = Psychologist::from_payload(payload);
        psychologist.name = fields.name;
        psychologist.license_number = fields.license_number;
        psychologist.email = fields.email;
        psychologist.phone = fields.phone;
        self.db.update_psychologist(&psychologist)?;
        self.find_one(id)
    }

    /// Remove a psychologist. Their agendas go with them; their patients
    /// stay, unassigned.
    pub fn remove(&self, id: &str) -> ServiceResult<()> {
        if !self.db.delete_psychologist(id)? {
            return Err(ServiceError::NotFound(format!("psychologist {id}")));
        }
        tracing::info!(psychologist_id = %id, "psychologist removed");
        Ok(())
    }
}
