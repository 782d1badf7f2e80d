// src/models/visits.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Qualquer status pode ir para qualquer outro; nada muda sozinho.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum VisitStatus {
    #[default]
    Planned,
    Completed,
    Cancelled,
    Rescheduled,
}

impl VisitStatus {
    pub const ALL: [VisitStatus; 4] = [
        VisitStatus::Planned,
        VisitStatus::Completed,
        VisitStatus::Cancelled,
        VisitStatus::Rescheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Planned => "Planned",
            VisitStatus::Completed => "Completed",
            VisitStatus::Cancelled => "Cancelled",
            VisitStatus::Rescheduled => "Rescheduled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: Uuid,
    pub customer_id: Uuid,
    /// Nome do cliente no momento em que a visita foi registrada.
    #[schema(example = "Acme Polymers Pvt Ltd")]
    pub customer_name: String,
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub date: NaiveDate,
    #[schema(example = "Quarterly review")]
    pub purpose: String,
    #[schema(example = "Priya")]
    pub assigned_to: String,
    pub status: VisitStatus,
    pub notes: String,
    pub last_modified_by: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitForm {
    /// Obrigatório ao registrar uma visita; ignorado na edição.
    pub customer_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    #[validate(length(max = 500, message = "too_long"))]
    pub purpose: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<VisitStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitStatusPayload {
    pub status: VisitStatus,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct VisitQuery {
    /// Texto livre sobre nome do cliente, objetivo e responsável.
    pub search: Option<String>,
    /// Status da visita ou "All".
    pub status: Option<String>,
    pub customer_id: Option<Uuid>,
}
