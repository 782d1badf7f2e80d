// src/main.rs

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::{config::AppState, docs::ApiDoc};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new().await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Database migrations applied");

    let geo_routes = Router::new()
        .route("/zones", get(handlers::dashboard::list_zones))
        .route("/resolve", get(handlers::crm::resolve_location));

    let customer_routes = Router::new()
        .route("/"
               ,post(handlers::crm::create_customer)
               .get(handlers::crm::list_customers)
        )
        .route("/export", get(handlers::crm::export_customers))
        .route("/{id}"
               ,get(handlers::crm::get_customer)
               .put(handlers::crm::update_customer)
               .delete(handlers::crm::delete_customer)
        )
        .route("/{id}/pricing", post(handlers::crm::add_price_quote));

    let visit_routes = Router::new()
        .route("/"
               ,post(handlers::visits::log_visit)
               .get(handlers::visits::list_visits)
        )
        .route("/{id}"
               ,put(handlers::visits::update_visit)
               .delete(handlers::visits::delete_visit)
        )
        .route("/{id}/status", post(handlers::visits::set_visit_status));

    let bind_addr = app_state.config.bind_addr.clone();

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/personnel", get(handlers::dashboard::get_personnel))
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/geo", geo_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/visits", visit_routes)
        .with_state(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
