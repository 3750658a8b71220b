//! Standard response envelopes and the user-facing messages.

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub const CREATED_MESSAGE: &str = "Aluno salvo com sucesso!";
pub const UPDATED_MESSAGE: &str = "Aluno atualizado com sucesso!";
pub const DELETED_MESSAGE: &str = "Aluno deletado com sucesso!";
pub const PHOTO_MESSAGE: &str = "Foto atualizada com sucesso!";
pub const NOT_FOUND_MESSAGE: &str = "Aluno não encontrado";

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: MetaCount,
}

#[derive(Serialize)]
pub struct MetaCount {
    pub count: u64,
}

#[derive(Serialize, Debug)]
pub struct MessageBody {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foto: Option<String>,
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::OK, Json(SuccessOne { data }))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<SuccessMany<T>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(SuccessMany {
            data,
            meta: MetaCount { count },
        }),
    )
}

pub fn created(id: i64) -> (StatusCode, Json<MessageBody>) {
    (
        StatusCode::CREATED,
        Json(MessageBody {
            message: CREATED_MESSAGE,
            id: Some(id),
            foto: None,
        }),
    )
}

pub fn message(message: &'static str) -> (StatusCode, Json<MessageBody>) {
    (
        StatusCode::OK,
        Json(MessageBody {
            message,
            id: None,
            foto: None,
        }),
    )
}
