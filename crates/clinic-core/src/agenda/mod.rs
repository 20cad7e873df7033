//! Psychologists and their weekly agendas.
//!
//! Every agenda write runs [`validate_agendas`] first; a rejected submission
//! never reaches the database.

mod psychologists;
mod validator;

pub use psychologists::*;
pub use validator::*;

use crate::db::Database;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Agenda, AgendaRequest, UpdateAgendaRequest};
use crate::validation::require;

/// Agenda operations.
pub struct AgendaService<'a> {
    db: &'a Database,
}

impl<'a> AgendaService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create an agenda for an existing psychologist.
    pub fn create(&self, request: &AgendaRequest) -> ServiceResult<Agenda> {
        require(&request.psychologist_id, "psychologistId")?;
        validate_agendas(&request.agendas)?;

        let agenda = self.db.with_transaction(|db| {
            if db.get_psychologist(&request.psychologist_id)?.is_none() {
                return Err(ServiceError::NotFound(format!(
                    "psychologist {}",
                    request.psychologist_id
                )));
            }
            let agenda = Agenda::new(request.psychologist_id.clone(), request.agendas.clone());
            db.insert_agenda(&agenda)?;
            Ok(agenda)
        })?;

        tracing::info!(
            agenda_id = %agenda.id,
            psychologist_id = %agenda.psychologist_id,
            days = agenda.days.len(),
            "agenda created"
        );
        Ok(agenda)
    }

    /// Replace the day entries of an agenda.
    pub fn update(&self, id: &str, request: &UpdateAgendaRequest) -> ServiceResult<Agenda> {
        validate_agendas(&request.agendas)?;

        self.db.with_transaction(|db| {
            if !db.replace_agenda_days(id, &request.agendas)? {
                return Err(ServiceError::NotFound(format!("agenda {id}")));
            }
            Ok(())
        })?;

        tracing::debug!(agenda_id = %id, days = request.agendas.len(), "agenda updated");
        self.find_one(id)
    }

    pub fn find_all(&self) -> ServiceResult<Vec<Agenda>> {
        Ok(self.db.list_agendas()?)
    }

    pub fn find_all_for_psychologist(&self, psychologist_id: &str) -> ServiceResult<Vec<Agenda>> {
        Ok(self.db.list_agendas_for_psychologist(psychologist_id)?)
    }

    pub fn find_one(&self, id: &str) -> ServiceResult<Agenda> {
        self.db
            .get_agenda(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("agenda {id}")))
    }

    pub fn remove(&self, id: &str) -> ServiceResult<()> {
        if !self.db.delete_agenda(id)? {
            return Err(ServiceError::NotFound(format!("agenda {id}")));
        }
        tracing::info!(agenda_id = %id, "agenda removed");
        Ok(())
    }
}
