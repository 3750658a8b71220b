//! Profile photo files: extension allow-list, filename sanitization, storage under the upload dir.

use crate::error::AppError;
use regex::Regex;
use std::path::{Path, PathBuf};

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// URL prefix the upload dir is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Clone, Debug)]
pub struct PhotoStore {
    dir: PathBuf,
}

impl PhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PhotoStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the photo for aluno `id` and return its public reference (`/uploads/<file>`).
    pub async fn save(&self, id: i64, original_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        if bytes.is_empty() {
            return Err(AppError::Validation("arquivo vazio".into()));
        }
        let clean = sanitize_filename(original_name)?;
        if allowed_extension(&clean).is_none() {
            tracing::warn!(aluno_id = id, filename = %original_name, "rejected photo extension");
            return Err(AppError::Validation(format!(
                "extensão não permitida; use {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        let stored = format!("aluno_{}_{}_{}", id, uuid::Uuid::new_v4().simple(), clean);
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&stored), bytes).await?;
        tracing::info!(aluno_id = id, file = %stored, size = bytes.len(), "photo stored");
        Ok(format!("{}/{}", PUBLIC_PREFIX, stored))
    }

    /// Best-effort removal of a previously stored photo. References outside the upload dir are ignored.
    pub async fn remove(&self, reference: &str) {
        let Some(name) = reference.strip_prefix(PUBLIC_PREFIX).and_then(|r| r.strip_prefix('/')) else {
            return;
        };
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.dir.join(name)).await {
            tracing::debug!(file = %name, error = %e, "old photo not removed");
        }
    }
}

/// Lowercased extension when it is in the allow-list.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Keep only the last path component, replace anything outside `[A-Za-z0-9._-]`, drop leading dots.
pub fn sanitize_filename(name: &str) -> Result<String, AppError> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let re = Regex::new(r"[^A-Za-z0-9._-]+").map_err(|e| AppError::Validation(e.to_string()))?;
    let replaced = re.replace_all(base.trim(), "_");
    let clean = replaced.trim_start_matches(['.', '_']).to_string();
    if clean.is_empty() {
        return Err(AppError::Validation("nome de arquivo inválido".into()));
    }
    Ok(clean)
}
