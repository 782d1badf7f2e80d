// src/models/session.rs

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::common::time::{format_provenance, now_in_target};

/// Quem age e quando. Passado explicitamente a cada save; a proveniência
/// nunca depende de estado global.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub personnel: String,
    pub now: DateTime<Tz>,
}

impl SessionContext {
    pub fn new(personnel: impl Into<String>, now: DateTime<Tz>) -> Self {
        Self {
            personnel: personnel.into(),
            now,
        }
    }

    pub fn starting_now(personnel: impl Into<String>) -> Self {
        Self::new(personnel, now_in_target())
    }

    pub fn timestamp(&self) -> String {
        format_provenance(&self.now)
    }

    /// Data do calendário em IST.
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}
