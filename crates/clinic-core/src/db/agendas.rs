//! Agenda database operations.

use chrono::Weekday;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Agenda, DayAgenda};

impl Database {
    /// Insert an agenda and its day entries.
    pub fn insert_agenda(&self, agenda: &Agenda) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO agendas (id, psychologist_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                agenda.id,
                agenda.psychologist_id,
                agenda.created_at,
                agenda.updated_at,
            ],
        )?;
        self.insert_agenda_days(&agenda.id, &agenda.days)
    }

    /// Replace every day entry of an agenda.
    pub fn replace_agenda_days(&self, agenda_id: &str, days: &[DayAgenda]) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE agendas SET updated_at = ?2 WHERE id = ?1",
            params![agenda_id, chrono::Utc::now().to_rfc3339()],
        )?;
        if rows_affected == 0 {
            return Ok(false);
        }
        self.conn
            .execute("DELETE FROM agenda_days WHERE agenda_id = ?", [agenda_id])?;
        self.insert_agenda_days(agenda_id, days)?;
        Ok(true)
    }

    /// Get an agenda by ID.
    pub fn get_agenda(&self, id: &str) -> DbResult<Option<Agenda>> {
        self.conn
            .query_row(
                "SELECT id, psychologist_id, created_at, updated_at FROM agendas WHERE id = ?",
                [id],
                agenda_row,
            )
            .optional()?
            .map(|row| self.load_agenda(row))
            .transpose()
    }

    /// List every agenda.
    pub fn list_agendas(&self) -> DbResult<Vec<Agenda>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, psychologist_id, created_at, updated_at FROM agendas ORDER BY created_at, rowid",
        )?;
        let rows = stmt
            .query_map([], agenda_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(|row| self.load_agenda(row)).collect()
    }

    /// List the agendas of one psychologist.
    pub fn list_agendas_for_psychologist(&self, psychologist_id: &str) -> DbResult<Vec<Agenda>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, psychologist_id, created_at, updated_at
            FROM agendas
            WHERE psychologist_id = ?
            ORDER BY created_at, rowid
            "#,
        )?;
        let rows = stmt
            .query_map([psychologist_id], agenda_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(|row| self.load_agenda(row)).collect()
    }

    /// Delete an agenda (day entries cascade).
    pub fn delete_agenda(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM agendas WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    fn insert_agenda_days(&self, agenda_id: &str, days: &[DayAgenda]) -> DbResult<()> {
        for (position, day) in days.iter().enumerate() {
            let times_json = serde_json::to_string(&day.available_times)?;
            self.conn.execute(
                r#"
                INSERT INTO agenda_days (agenda_id, position, day, available_times)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![agenda_id, position as i64, day.day.to_string(), times_json],
            )?;
        }
        Ok(())
    }

    fn load_agenda(&self, row: AgendaRow) -> DbResult<Agenda> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT day, available_times
            FROM agenda_days
            WHERE agenda_id = ?
            ORDER BY position
            "#,
        )?;
        let raw_days = stmt
            .query_map([&row.id], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut days = Vec::with_capacity(raw_days.len());
        for (day, times) in raw_days {
            let day: Weekday = day
                .parse()
                .map_err(|_| DbError::Constraint(format!("unknown weekday: {day}")))?;
            days.push(DayAgenda {
                day,
                available_times: serde_json::from_str(&times)?,
            });
        }

        Ok(Agenda {
            id: row.id,
            psychologist_id: row.psychologist_id,
            days,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

struct AgendaRow {
    id: String,
    psychologist_id: String,
    created_at: String,
    updated_at: String,
}

fn agenda_row(row: &Row<'_>) -> rusqlite::Result<AgendaRow> {
    Ok(AgendaRow {
        id: row.get(0)?,
        psychologist_id: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}
