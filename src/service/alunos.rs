//! Student CRUD: validate first, then one store call per operation.

use crate::config::AlunoColumn;
use crate::error::AppError;
use crate::model::{Aluno, AlunoFilter, AlunoPatch};
use crate::response::NOT_FOUND_MESSAGE;
use crate::service::{PhotoStore, RequestValidator};
use crate::sql::BindValue;
use crate::store::AlunoStore;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct AlunoService {
    store: Arc<dyn AlunoStore>,
    photos: PhotoStore,
}

impl AlunoService {
    pub fn new(store: Arc<dyn AlunoStore>, photos: PhotoStore) -> Self {
        AlunoService { store, photos }
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    /// Insert from a JSON body; returns the assigned id.
    pub async fn create(&self, body: &Value) -> Result<i64, AppError> {
        let new = RequestValidator::validate_create(body)?;
        let id = self.store.insert(&new).await?;
        tracing::info!(aluno_id = id, "aluno created");
        Ok(id)
    }

    pub async fn list(&self, filter: &AlunoFilter) -> Result<Vec<Aluno>, AppError> {
        self.store.list(filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Aluno, AppError> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.into()))
    }

    /// Partial update. Matching an existing id is success even when no value changes.
    pub async fn update(&self, id: i64, body: &Value) -> Result<(), AppError> {
        let patch = RequestValidator::validate_patch(body)?;
        self.apply(id, &patch).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        match self.store.delete(id).await? {
            0 => Err(AppError::NotFound(NOT_FOUND_MESSAGE.into())),
            _ => {
                tracing::info!(aluno_id = id, "aluno deleted");
                Ok(())
            }
        }
    }

    /// Store a photo and point the record's `foto` at it. Returns the new reference.
    pub async fn attach_photo(&self, id: i64, filename: &str, bytes: &[u8]) -> Result<String, AppError> {
        let previous = self.get(id).await?.foto;
        let reference = self.photos.save(id, filename, bytes).await?;
        let patch = AlunoPatch::single(AlunoColumn::Foto, BindValue::Text(reference.clone()));
        if let Err(e) = self.apply(id, &patch).await {
            self.photos.remove(&reference).await;
            return Err(e);
        }
        if let Some(old) = previous.filter(|old| *old != reference) {
            self.photos.remove(&old).await;
        }
        Ok(reference)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }

    async fn apply(&self, id: i64, patch: &AlunoPatch) -> Result<(), AppError> {
        match self.store.update(id, patch).await? {
            0 => Err(AppError::NotFound(NOT_FOUND_MESSAGE.into())),
            n => {
                tracing::info!(aluno_id = id, fields = patch.len(), rows = n, "aluno updated");
                Ok(())
            }
        }
    }
}
