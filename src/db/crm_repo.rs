// src/db/crm_repo.rs

use sqlx::{types::Json, Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::crm::Customer};

/// Persistência de clientes. Registros são substituídos inteiros; não há
/// update parcial de campos.
#[derive(Clone, Default)]
pub struct CrmRepository;

impl CrmRepository {
    pub fn new() -> Self {
        Self
    }

    /// Coleção inteira na ordem de inserção.
    pub async fn list_customers<'e, E>(&self, executor: E) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows: Vec<(Json<Customer>,)> =
            sqlx::query_as("SELECT data FROM customers ORDER BY position ASC")
                .fetch_all(executor)
                .await?;

        Ok(rows.into_iter().map(|(Json(customer),)| customer).collect())
    }

    pub async fn find_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row: Option<(Json<Customer>,)> =
            sqlx::query_as("SELECT data FROM customers WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(row.map(|(Json(customer),)| customer))
    }

    /// `is_new` decide entre insert e replace. Substituir um registro ausente é
    /// erro, assim como inserir um id já usado.
    pub async fn save_customer<'e, E>(&self, executor: E, customer: &Customer, is_new: bool) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if is_new {
            sqlx::query("INSERT INTO customers (id, data) VALUES ($1, $2)")
                .bind(customer.id)
                .bind(Json(customer))
                .execute(executor)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.is_unique_violation() {
                            return AppError::DuplicateRecord;
                        }
                    }
                    e.into()
                })?;
        } else {
            let result = sqlx::query("UPDATE customers SET data = $2, updated_at = NOW() WHERE id = $1")
                .bind(customer.id)
                .bind(Json(customer))
                .execute(executor)
                .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::CustomerNotFound);
            }
        }

        Ok(())
    }

    pub async fn delete_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::CustomerNotFound);
        }
        Ok(())
    }
}
