//! PostgreSQL-backed store: runs statements from the SQL builder on a pool.

use super::AlunoStore;
use crate::error::AppError;
use crate::model::{Aluno, AlunoFilter, AlunoPatch, NewAluno};
use crate::sql::{delete, insert, select_by_id, select_list, to_arguments, update, QueryBuf};
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgAlunoStore {
    pool: PgPool,
}

impl PgAlunoStore {
    pub fn new(pool: PgPool) -> Self {
        PgAlunoStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let result = sqlx::query_with(&q.sql, to_arguments(&q.params)?)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn fetch_many(&self, q: &QueryBuf) -> Result<Vec<Aluno>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = sqlx::query_as_with::<_, Aluno, _>(&q.sql, to_arguments(&q.params)?)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Aluno>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = sqlx::query_as_with::<_, Aluno, _>(&q.sql, to_arguments(&q.params)?)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl AlunoStore for PgAlunoStore {
    async fn insert(&self, aluno: &NewAluno) -> Result<i64, AppError> {
        let q = insert(aluno);
        tracing::debug!(sql = %q.sql, params = ?q.params, "insert");
        let id = sqlx::query_scalar_with::<_, i64, _>(&q.sql, to_arguments(&q.params)?)
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn list(&self, filter: &AlunoFilter) -> Result<Vec<Aluno>, AppError> {
        self.fetch_many(&select_list(filter)).await
    }

    async fn find(&self, id: i64) -> Result<Option<Aluno>, AppError> {
        self.fetch_optional(&select_by_id(id)).await
    }

    async fn update(&self, id: i64, patch: &AlunoPatch) -> Result<u64, AppError> {
        let q = update(id, patch)?;
        self.execute(&q).await
    }

    async fn delete(&self, id: i64) -> Result<u64, AppError> {
        self.execute(&delete(id)).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
