// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

/// Contador de badge. A categoria "All" sempre traz o tamanho da coleção.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    #[schema(example = "North")]
    pub category: String,
    #[schema(example = 12)]
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_customers: usize,
    pub total_visits: usize,
    pub customers_by_zone: Vec<CategoryCount>,
    pub customers_by_status: Vec<CategoryCount>,
    pub visits_by_status: Vec<CategoryCount>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelRoster {
    pub personnel: Vec<String>,
    pub default_personnel: String,
    /// Resolvido a partir do header `x-personnel`.
    pub acting_personnel: String,
}
