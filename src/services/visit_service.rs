// src/services/visit_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CrmRepository, VisitRepository},
    models::{
        session::SessionContext,
        visits::{Visit, VisitForm, VisitQuery, VisitStatus},
    },
    services::{
        normalize::{normalize_visit, transition_visit, VisitBasis},
        query_service::QueryService,
    },
};

#[derive(Clone)]
pub struct VisitService {
    repo: VisitRepository,
    crm_repo: CrmRepository,
    query: QueryService,
}

impl VisitService {
    pub fn new(repo: VisitRepository, crm_repo: CrmRepository, query: QueryService) -> Self {
        Self { repo, crm_repo, query }
    }

    /// Mais recentes primeiro.
    pub async fn list_visits<'e, E>(&self, executor: E, filters: &VisitQuery) -> Result<Vec<Visit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let visits = self.repo.list_visits(executor).await?;
        Ok(self
            .query
            .query_visits(&visits, filters)
            .into_iter()
            .cloned()
            .collect())
    }

    /// O cliente precisa existir agora; o nome atual é copiado para a visita.
    pub async fn log_visit<'e, E>(
        &self,
        executor: E,
        form: &VisitForm,
        session: &SessionContext,
    ) -> Result<Visit, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let customer_id = form.customer_id.ok_or(AppError::RequiredField("customerId"))?;

        let mut tx = executor.begin().await?;

        let customer = self
            .crm_repo
            .find_customer(&mut *tx, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let visit = normalize_visit(form, VisitBasis::New(&customer), session);
        self.repo.save_visit(&mut *tx, &visit, true).await?;

        tx.commit().await?;

        tracing::info!(visit_id = %visit.id, customer_id = %customer.id, by = %session.personnel, "visit logged");
        Ok(visit)
    }

    pub async fn update_visit<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        form: &VisitForm,
        session: &SessionContext,
    ) -> Result<Visit, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let existing = self
            .repo
            .find_visit(&mut *tx, id)
            .await?
            .ok_or(AppError::VisitNotFound)?;

        let visit = normalize_visit(form, VisitBasis::Edit(&existing), session);
        self.repo.save_visit(&mut *tx, &visit, false).await?;

        tx.commit().await?;
        Ok(visit)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: VisitStatus,
        session: &SessionContext,
    ) -> Result<Visit, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let existing = self
            .repo
            .find_visit(&mut *tx, id)
            .await?
            .ok_or(AppError::VisitNotFound)?;

        let visit = transition_visit(&existing, status, session);
        self.repo.save_visit(&mut *tx, &visit, false).await?;

        tx.commit().await?;

        tracing::info!(
            visit_id = %visit.id,
            from = existing.status.as_str(),
            to = visit.status.as_str(),
            by = %session.personnel,
            "visit status changed"
        );
        Ok(visit)
    }

    pub async fn delete_visit<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        session: &SessionContext,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete_visit(executor, id).await?;
        tracing::warn!(visit_id = %id, by = %session.personnel, "visit deleted");
        Ok(())
    }
}
