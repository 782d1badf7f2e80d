// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{CrmRepository, VisitRepository},
    models::geo::GeoReference,
    services::{
        crm_service::CrmService, dashboard_service::DashboardService,
        document_service::DocumentService, location_service::LocationService,
        query_service::QueryService, visit_service::VisitService,
    },
};

const FALLBACK_PERSONNEL: &str = "Admin";

/// Configurações lidas do ambiente (e do `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub geo_config_path: Option<PathBuf>,
    pub personnel: Vec<String>,
    pub default_personnel: String,
    pub fonts_dir: String,
    pub font_family: String,
}

/// "Priya, Arjun ,,Meera" -> ["Priya", "Arjun", "Meera"]
pub fn parse_roster(raw: &str) -> Vec<String> {
    let mut roster: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !roster.iter().any(|r| r == name) {
            roster.push(name.to_string());
        }
    }
    roster
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let personnel = optional_var("PERSONNEL").map(|raw| parse_roster(&raw)).unwrap_or_default();
        let default_personnel = optional_var("DEFAULT_PERSONNEL")
            .or_else(|| personnel.first().cloned())
            .unwrap_or_else(|| FALLBACK_PERSONNEL.to_string());

        if !personnel.is_empty() && !personnel.contains(&default_personnel) {
            anyhow::bail!("DEFAULT_PERSONNEL '{}' is not listed in PERSONNEL", default_personnel);
        }

        Ok(Self {
            database_url,
            bind_addr: optional_var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            geo_config_path: optional_var("GEO_CONFIG_PATH").map(PathBuf::from),
            personnel,
            default_personnel,
            fonts_dir: optional_var("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string()),
            font_family: optional_var("FONT_FAMILY").unwrap_or_else(|| "Roboto".to_string()),
        })
    }

    /// Lista vazia aceita qualquer nome.
    pub fn is_known_personnel(&self, name: &str) -> bool {
        self.personnel.is_empty() || self.personnel.iter().any(|p| p == name)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub crm_service: CrmService,
    pub visit_service: VisitService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = AppConfig::from_env()?;

        let geo = match &config.geo_config_path {
            Some(path) => {
                let geo = GeoReference::from_json_file(path)?;
                tracing::info!(path = %path.display(), states = geo.states.len(), "geo reference loaded");
                geo
            }
            None => {
                tracing::info!("GEO_CONFIG_PATH not set, using the built-in geo reference");
                GeoReference::builtin()
            }
        };

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Database connection established");

        // --- Grafo de dependências ---
        let location = LocationService::new(Arc::new(geo));
        let query = QueryService::new(location.clone());
        let crm_repo = CrmRepository::new();
        let visit_repo = VisitRepository::new();

        let crm_service = CrmService::new(crm_repo.clone(), location, query.clone());
        let visit_service = VisitService::new(visit_repo.clone(), crm_repo.clone(), query.clone());
        let dashboard_service = DashboardService::new(crm_repo.clone(), visit_repo, query.clone());
        let document_service = DocumentService::new(
            crm_repo,
            query,
            config.fonts_dir.clone(),
            config.font_family.clone(),
        );

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            crm_service,
            visit_service,
            dashboard_service,
            document_service,
        })
    }
}
