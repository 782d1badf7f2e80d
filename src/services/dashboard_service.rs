// src/services/dashboard_service.rs

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{CrmRepository, VisitRepository},
    models::dashboard::DashboardSummary,
    services::query_service::QueryService,
};

#[derive(Clone)]
pub struct DashboardService {
    crm_repo: CrmRepository,
    visit_repo: VisitRepository,
    query: QueryService,
}

impl DashboardService {
    pub fn new(crm_repo: CrmRepository, visit_repo: VisitRepository, query: QueryService) -> Self {
        Self { crm_repo, visit_repo, query }
    }

    pub fn zones(&self) -> Vec<String> {
        self.query.zones()
    }

    /// Contadores sobre as coleções inteiras, independentes dos filtros da lista.
    pub async fn get_summary<'e, E>(&self, executor: E) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Um único snapshot para as duas coleções
        let mut tx = executor.begin().await?;
        let customers = self.crm_repo.list_customers(&mut *tx).await?;
        let visits = self.visit_repo.list_visits(&mut *tx).await?;
        tx.commit().await?;

        Ok(DashboardSummary {
            total_customers: customers.len(),
            total_visits: visits.len(),
            customers_by_zone: self.query.zone_counts(&customers),
            customers_by_status: self.query.customer_status_counts(&customers),
            visits_by_status: self.query.visit_status_counts(&visits),
        })
    }
}
