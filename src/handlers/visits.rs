// src/handlers/visits.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::crm::DeleteParams,
    models::{
        session::SessionContext,
        visits::{Visit, VisitForm, VisitQuery, VisitStatusPayload},
    },
};

// GET /api/visits
#[utoipa::path(
    get,
    path = "/api/visits",
    tag = "Visits",
    params(VisitQuery),
    responses(
        (status = 200, description = "Visits, most recent first", body = Vec<Visit>)
    )
)]
pub async fn list_visits(
    State(app_state): State<AppState>,
    Query(filters): Query<VisitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let visits = app_state.visit_service
        .list_visits(&app_state.db_pool, &filters)
        .await?;

    Ok((StatusCode::OK, Json(visits)))
}

// POST /api/visits
#[utoipa::path(
    post,
    path = "/api/visits",
    tag = "Visits",
    request_body = VisitForm,
    params(("x-personnel" = Option<String>, Header, description = "Acting personnel, default assignee")),
    responses(
        (status = 201, description = "Visit logged", body = Visit),
        (status = 400, description = "customerId missing"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn log_visit(
    State(app_state): State<AppState>,
    session: SessionContext,
    Json(payload): Json<VisitForm>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let visit = app_state.visit_service
        .log_visit(&app_state.db_pool, &payload, &session)
        .await?;

    Ok((StatusCode::CREATED, Json(visit)))
}

// PUT /api/visits/{id}
#[utoipa::path(
    put,
    path = "/api/visits/{id}",
    tag = "Visits",
    request_body = VisitForm,
    params(("id" = Uuid, Path, description = "Visit id")),
    responses(
        (status = 200, description = "Visit replaced", body = Visit),
        (status = 404, description = "Visit not found")
    )
)]
pub async fn update_visit(
    State(app_state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisitForm>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let visit = app_state.visit_service
        .update_visit(&app_state.db_pool, id, &payload, &session)
        .await?;

    Ok((StatusCode::OK, Json(visit)))
}

// POST /api/visits/{id}/status
#[utoipa::path(
    post,
    path = "/api/visits/{id}/status",
    tag = "Visits",
    request_body = VisitStatusPayload,
    params(("id" = Uuid, Path, description = "Visit id")),
    responses(
        (status = 200, description = "Status changed", body = Visit),
        (status = 404, description = "Visit not found")
    )
)]
pub async fn set_visit_status(
    State(app_state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisitStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let visit = app_state.visit_service
        .set_status(&app_state.db_pool, id, payload.status, &session)
        .await?;

    Ok((StatusCode::OK, Json(visit)))
}

// DELETE /api/visits/{id}?confirm=true
#[utoipa::path(
    delete,
    path = "/api/visits/{id}",
    tag = "Visits",
    params(
        ("id" = Uuid, Path, description = "Visit id"),
        DeleteParams
    ),
    responses(
        (status = 204, description = "Visit deleted"),
        (status = 400, description = "Confirmation missing"),
        (status = 404, description = "Visit not found")
    )
)]
pub async fn delete_visit(
    State(app_state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<impl IntoResponse, AppError> {
    params.require_confirmation()?;

    app_state.visit_service
        .delete_visit(&app_state.db_pool, id, &session)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
