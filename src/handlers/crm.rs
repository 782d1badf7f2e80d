// src/handlers/crm.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        crm::{Customer, CustomerForm, CustomerQuery, PriceQuotePayload},
        export::ExportParams,
        geo::ResolvedLocation,
        session::SessionContext,
    },
};

/// `?confirm=true` é a confirmação explícita que toda exclusão exige.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}

impl DeleteParams {
    pub fn require_confirmation(&self) -> Result<(), AppError> {
        if self.confirm { Ok(()) } else { Err(AppError::ConfirmationRequired) }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResolveParams {
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

// =============================================================================
//  GEO
// =============================================================================

// GET /api/geo/resolve
#[utoipa::path(
    get,
    path = "/api/geo/resolve",
    tag = "Geo",
    params(ResolveParams),
    responses(
        (status = 200, description = "City, state and zone inferred from partial input", body = ResolvedLocation)
    )
)]
pub async fn resolve_location(
    State(app_state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> impl IntoResponse {
    let resolved = app_state.crm_service.resolve_location(
        params.city.as_deref(),
        params.state.as_deref(),
        params.pincode.as_deref(),
    );

    (StatusCode::OK, Json(resolved))
}

// =============================================================================
//  CLIENTES
// =============================================================================

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Filtered customer list", body = Vec<Customer>)
    )
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    Query(filters): Query<CustomerQuery>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.crm_service
        .list_customers(&app_state.db_pool, &filters)
        .await?;

    Ok((StatusCode::OK, Json(customers)))
}

// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = Customer),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.crm_service
        .get_customer(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CustomerForm,
    params(("x-personnel" = Option<String>, Header, description = "Acting personnel")),
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    session: SessionContext,
    Json(payload): Json<CustomerForm>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if payload.name.as_deref().map(str::trim).unwrap_or_default().is_empty() {
        return Err(AppError::RequiredField("name"));
    }

    let customer = app_state.crm_service
        .create_customer(&app_state.db_pool, &payload, &session)
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    request_body = CustomerForm,
    params(
        ("id" = Uuid, Path, description = "Customer id"),
        ("x-personnel" = Option<String>, Header, description = "Acting personnel")
    ),
    responses(
        (status = 200, description = "Customer replaced", body = Customer),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerForm>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state.crm_service
        .update_customer(&app_state.db_pool, id, &payload, &session)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/customers/{id}?confirm=true
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(
        ("id" = Uuid, Path, description = "Customer id"),
        DeleteParams
    ),
    responses(
        (status = 204, description = "Customer purged"),
        (status = 400, description = "Confirmation missing"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> Result<impl IntoResponse, AppError> {
    params.require_confirmation()?;

    app_state.crm_service
        .delete_customer(&app_state.db_pool, id, &session)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/customers/{id}/pricing
#[utoipa::path(
    post,
    path = "/api/customers/{id}/pricing",
    tag = "Customers",
    request_body = PriceQuotePayload,
    params(("id" = Uuid, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Quote appended to the pricing history", body = Customer),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn add_price_quote(
    State(app_state): State<AppState>,
    session: SessionContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PriceQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state.crm_service
        .add_price_quote(&app_state.db_pool, id, &payload, &session)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// =============================================================================
//  EXPORTAÇÃO
// =============================================================================

// GET /api/customers/export?format=pdf&zone=North
#[utoipa::path(
    get,
    path = "/api/customers/export",
    tag = "Customers",
    params(CustomerQuery, ExportParams),
    responses(
        (status = 200, description = "CSV or PDF of the filtered customers")
    )
)]
pub async fn export_customers(
    State(app_state): State<AppState>,
    Query(filters): Query<CustomerQuery>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    let file = app_state.document_service
        .export_customers(&app_state.db_pool, &filters, params.format.unwrap_or_default())
        .await?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type.to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file.filename)),
    ];

    Ok((headers, file.bytes).into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::Uri;

    use super::*;

    fn delete_params(uri: &str) -> DeleteParams {
        let uri: Uri = uri.parse().unwrap();
        Query::<DeleteParams>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_delete_requires_explicit_confirmation() {
        for uri in [
            "/api/customers/6f1c2d9e-0000-4000-8000-000000000001",
            "/api/customers/6f1c2d9e-0000-4000-8000-000000000001?confirm=false",
        ] {
            let err = delete_params(uri).require_confirmation().unwrap_err();
            assert!(matches!(err, AppError::ConfirmationRequired));
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }

        let confirmed = delete_params("/api/visits/6f1c2d9e-0000-4000-8000-000000000001?confirm=true");
        assert!(confirmed.require_confirmation().is_ok());
    }

    #[test]
    fn test_malformed_confirm_is_rejected_by_the_extractor() {
        let uri: Uri = "/api/visits/x?confirm=yes".parse().unwrap();
        assert!(Query::<DeleteParams>::try_from_uri(&uri).is_err());
    }
}
