//! In-memory store with the same affected-row semantics as the PostgreSQL one.

use super::AlunoStore;
use crate::error::AppError;
use crate::model::{Aluno, AlunoFilter, AlunoPatch, NewAluno};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryAlunoStore {
    rows: Mutex<BTreeMap<i64, Aluno>>,
    next_id: Mutex<i64>,
    /// When set, every call fails like a lost connection.
    offline: AtomicBool,
}

impl MemoryAlunoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn rows(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<i64, Aluno>>, AppError> {
        self.check_online()?;
        self.rows.lock().map_err(|_| AppError::Db(sqlx::Error::PoolClosed))
    }
}

#[async_trait]
impl AlunoStore for MemoryAlunoStore {
    async fn insert(&self, aluno: &NewAluno) -> Result<i64, AppError> {
        let mut rows = self.rows()?;
        let mut next_id = self.next_id.lock().map_err(|_| AppError::Db(sqlx::Error::PoolClosed))?;
        *next_id += 1;
        let id = *next_id;
        rows.insert(id, aluno.clone().into_aluno(id));
        Ok(id)
    }

    async fn list(&self, filter: &AlunoFilter) -> Result<Vec<Aluno>, AppError> {
        let rows = self.rows()?;
        let term = filter.nome_term();
        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.effective_limit().map(|n| n as usize).unwrap_or(usize::MAX);
        Ok(rows
            .values()
            .filter(|a| term.map(|t| a.nome.contains(t)).unwrap_or(true))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Aluno>, AppError> {
        Ok(self.rows()?.get(&id).cloned())
    }

    async fn update(&self, id: i64, patch: &AlunoPatch) -> Result<u64, AppError> {
        let mut rows = self.rows()?;
        let Some(row) = rows.get_mut(&id) else { return Ok(0) };
        let mut updated = row.clone();
        for (column, value) in patch.iter() {
            updated.set(column, value)?;
        }
        *row = updated;
        Ok(1)
    }

    async fn delete(&self, id: i64) -> Result<u64, AppError> {
        Ok(self.rows()?.remove(&id).map(|_| 1).unwrap_or(0))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_online()
    }
}
