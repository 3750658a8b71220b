//! Academia Alunos: student registration REST backend over PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use model::{Aluno, AlunoFilter, AlunoPatch, NewAluno};
pub use routes::{alunos_routes, app, common_routes};
pub use service::{AlunoService, PhotoStore};
pub use state::AppState;
pub use store::{ensure_alunos_table, ensure_database_exists, AlunoStore, PgAlunoStore};
