//! Aluno CRUD routes and the intake page.

use crate::handlers::alunos::{create, delete as delete_handler, list, read, update, upload_photo};
use crate::handlers::pages::index;
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn alunos_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/alunos", get(list).post(create))
        .route("/alunos/:id", get(read).put(update).delete(delete_handler))
        .route("/alunos/:id/foto", post(upload_photo))
        .with_state(state)
}
