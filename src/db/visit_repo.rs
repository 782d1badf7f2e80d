// src/db/visit_repo.rs

use sqlx::{types::Json, Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::visits::Visit};

#[derive(Clone, Default)]
pub struct VisitRepository;

impl VisitRepository {
    pub fn new() -> Self {
        Self
    }

    /// Ordem de inserção; a ordenação por data fica com o motor de consulta.
    pub async fn list_visits<'e, E>(&self, executor: E) -> Result<Vec<Visit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows: Vec<(Json<Visit>,)> =
            sqlx::query_as("SELECT data FROM visits ORDER BY position ASC")
                .fetch_all(executor)
                .await?;

        Ok(rows.into_iter().map(|(Json(visit),)| visit).collect())
    }

    pub async fn find_visit<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Visit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row: Option<(Json<Visit>,)> = sqlx::query_as("SELECT data FROM visits WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(row.map(|(Json(visit),)| visit))
    }

    pub async fn save_visit<'e, E>(&self, executor: E, visit: &Visit, is_new: bool) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if is_new {
            sqlx::query("INSERT INTO visits (id, customer_id, data) VALUES ($1, $2, $3)")
                .bind(visit.id)
                .bind(visit.customer_id)
                .bind(Json(visit))
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
            let result = sqlx::query("UPDATE visits SET data = $2, updated_at = NOW() WHERE id = $1")
                .bind(visit.id)
                .bind(Json(visit))
                .execute(executor)
                .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::VisitNotFound);
            }
        }

        Ok(())
    }

    pub async fn delete_visit<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM visits WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::VisitNotFound);
        }
        Ok(())
    }
}
