// src/services/crm_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CrmRepository,
    models::{
        crm::{Customer, CustomerForm, CustomerQuery, PriceQuotePayload},
        geo::ResolvedLocation,
        session::SessionContext,
    },
    services::{
        location_service::LocationService,
        normalize::{append_price_quote, normalize_customer},
        query_service::QueryService,
    },
};

/// Ciclo de vida do cliente. Todo save grava primeiro e só então devolve o
/// registro; uma escrita que falha não deixa nada para desfazer.
#[derive(Clone)]
pub struct CrmService {
    repo: CrmRepository,
    location: LocationService,
    query: QueryService,
}

impl CrmService {
    pub fn new(repo: CrmRepository, location: LocationService, query: QueryService) -> Self {
        Self { repo, location, query }
    }

    // =========================================================================
    //  PRÉVIA DE LOCALIZAÇÃO
    // =========================================================================

    pub fn resolve_location(
        &self,
        city: Option<&str>,
        state: Option<&str>,
        pincode: Option<&str>,
    ) -> ResolvedLocation {
        self.location.resolve(city, state, pincode)
    }

    // =========================================================================
    //  LEITURAS
    // =========================================================================

    pub async fn list_customers<'e, E>(
        &self,
        executor: E,
        filters: &CustomerQuery,
    ) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customers = self.repo.list_customers(executor).await?;
        Ok(self
            .query
            .query_customers(&customers, filters)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn get_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_customer(executor, id)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    // =========================================================================
    //  ESCRITAS
    // =========================================================================

    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        form: &CustomerForm,
        session: &SessionContext,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = normalize_customer(&self.location, form, None, session);
        self.repo.save_customer(executor, &customer, true).await?;

        tracing::info!(customer_id = %customer.id, by = %session.personnel, "customer created");
        Ok(customer)
    }

    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        form: &CustomerForm,
        session: &SessionContext,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let existing = self
            .repo
            .find_customer(&mut *tx, id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let customer = normalize_customer(&self.location, form, Some(&existing), session);
        self.repo.save_customer(&mut *tx, &customer, false).await?;

        tx.commit().await?;

        tracing::info!(customer_id = %customer.id, by = %session.personnel, "customer updated");
        Ok(customer)
    }

    pub async fn add_price_quote<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &PriceQuotePayload,
        session: &SessionContext,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let existing = self
            .repo
            .find_customer(&mut *tx, id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let customer = append_price_quote(&existing, payload, session);
        self.repo.save_customer(&mut *tx, &customer, false).await?;

        tx.commit().await?;
        Ok(customer)
    }

    /// Irreversível. As visitas do cliente mantêm sua cópia do nome.
    pub async fn delete_customer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        session: &SessionContext,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete_customer(executor, id).await?;
        tracing::warn!(customer_id = %id, by = %session.personnel, "customer purged");
        Ok(())
    }
}
