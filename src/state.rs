//! Shared application state for all routes. Built once at startup, read-only afterwards.

use crate::config::AppConfig;
use crate::service::AlunoService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub alunos: AlunoService,
    pub config: Arc<AppConfig>,
}
