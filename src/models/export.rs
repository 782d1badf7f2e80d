// src/models/export.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_INDUSTRY: &str = "General Mfg";
pub const NOT_AVAILABLE: &str = "N/A";

/// Uma linha plana de exportação. A ordem das colunas é fixada por `HEADERS`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    pub name: String,
    pub city: String,
    pub state: String,
    pub zone: String,
    pub industry: String,
    /// Faturamento anual em crores, duas casas.
    #[schema(example = "5.00")]
    pub turnover_cr: String,
    pub last_modified_by: String,
    pub updated_at: String,
}

impl ExportRow {
    pub const HEADERS: [&'static str; 8] = [
        "Name",
        "City",
        "State",
        "Zone",
        "Industry",
        "Turnover (Cr)",
        "Last Modified By",
        "Last Updated",
    ];

    pub fn cells(&self) -> [&str; 8] {
        [
            self.name.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.zone.as_str(),
            self.industry.as_str(),
            self.turnover_cr.as_str(),
            self.last_modified_by.as_str(),
            self.updated_at.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportParams {
    /// "csv" (padrão) ou "pdf".
    pub format: Option<ExportFormat>,
}

/// Exportação renderizada, pronta para o navegador.
#[derive(Debug)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
