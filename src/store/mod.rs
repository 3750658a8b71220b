//! Record store for student rows. One statement per call; no transactions.

mod bootstrap;
#[cfg(test)]
pub(crate) mod memory;
mod postgres;

pub use bootstrap::{ensure_alunos_table, ensure_database_exists};
pub use postgres::PgAlunoStore;

use crate::error::AppError;
use crate::model::{Aluno, AlunoFilter, AlunoPatch, NewAluno};
use async_trait::async_trait;

#[async_trait]
pub trait AlunoStore: Send + Sync {
    /// Insert one row and return its assigned id.
    async fn insert(&self, aluno: &NewAluno) -> Result<i64, AppError>;

    async fn list(&self, filter: &AlunoFilter) -> Result<Vec<Aluno>, AppError>;

    async fn find(&self, id: i64) -> Result<Option<Aluno>, AppError>;

    /// Apply a partial update. Returns the number of rows matched by id.
    async fn update(&self, id: i64, patch: &AlunoPatch) -> Result<u64, AppError>;

    /// Returns the number of rows removed.
    async fn delete(&self, id: i64) -> Result<u64, AppError>;

    /// Round-trip to the backend, for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}
