// src/handlers/dashboard.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        dashboard::{DashboardSummary, PersonnelRoster},
        session::SessionContext,
    },
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Badge counts per zone and status", body = DashboardSummary)
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service
        .get_summary(&app_state.db_pool)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/geo/zones
#[utoipa::path(
    get,
    path = "/api/geo/zones",
    tag = "Geo",
    responses(
        (status = 200, description = "Zones of the reference table, in table order", body = Vec<String>)
    )
)]
pub async fn list_zones(
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.dashboard_service.zones()))
}

// GET /api/personnel
#[utoipa::path(
    get,
    path = "/api/personnel",
    tag = "Personnel",
    params(("x-personnel" = Option<String>, Header, description = "Acting personnel")),
    responses(
        (status = 200, description = "Roster and the personnel this request acts as", body = PersonnelRoster),
        (status = 403, description = "Personnel not on the roster")
    )
)]
pub async fn get_personnel(
    State(app_state): State<AppState>,
    session: SessionContext,
) -> impl IntoResponse {
    let roster = PersonnelRoster {
        personnel: app_state.config.personnel.clone(),
        default_personnel: app_state.config.default_personnel.clone(),
        acting_personnel: session.personnel,
    };

    (StatusCode::OK, Json(roster))
}
