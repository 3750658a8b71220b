//! Aluno CRUD handlers: create, list, read, update, delete, photo upload.

use crate::error::AppError;
use crate::extractors::AlunoId;
use crate::model::AlunoFilter;
use crate::response::{self, DELETED_MESSAGE, PHOTO_MESSAGE, UPDATED_MESSAGE};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

/// Multipart field names accepted for the photo file.
const PHOTO_FIELDS: &[&str] = &["foto", "file"];

fn rejection_error(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(text)
    } else {
        AppError::Validation(text)
    }
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v)
        .map_err(|e| rejection_error(e.status(), e.body_text()))
}

fn multipart_error(e: MultipartError) -> AppError {
    rejection_error(e.status(), e.body_text())
}

/// True when the request announces a body, either by a non-zero length or chunked transfer.
fn has_body(headers: &HeaderMap) -> bool {
    let length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);
    length > 0 || headers.contains_key(header::TRANSFER_ENCODING)
}

fn parse_filter(params: HashMap<String, String>) -> Result<AlunoFilter, AppError> {
    let mut filter = AlunoFilter::default();
    for (k, v) in params {
        match k.as_str() {
            "nome" => filter.nome = Some(v),
            "limit" => {
                filter.limit = Some(v.parse().map_err(|_| AppError::Validation(format!("invalid limit: {}", v)))?);
            }
            "offset" => {
                filter.offset = Some(v.parse().map_err(|_| AppError::Validation(format!("invalid offset: {}", v)))?);
            }
            _ => {}
        }
    }
    Ok(filter)
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let filter = parse_filter(params)?;
    let rows = state.alunos.list(&filter).await?;
    Ok(response::success_many(rows))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(body)?;
    let id = state.alunos.create(&body).await?;
    Ok(response::created(id))
}

pub async fn read(State(state): State<AppState>, AlunoId(id): AlunoId) -> Result<impl IntoResponse, AppError> {
    let aluno = state.alunos.get(id).await?;
    Ok(response::success_one(aluno))
}

pub async fn update(
    State(state): State<AppState>,
    AlunoId(id): AlunoId,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = match body {
        Err(JsonRejection::MissingJsonContentType(_)) if !has_body(&headers) => Value::Null,
        other => json_body(other)?,
    };
    state.alunos.update(id, &body).await?;
    Ok(response::message(UPDATED_MESSAGE))
}

pub async fn delete(State(state): State<AppState>, AlunoId(id): AlunoId) -> Result<impl IntoResponse, AppError> {
    state.alunos.delete(id).await?;
    Ok(response::message(DELETED_MESSAGE))
}

/// POST /alunos/:id/foto: multipart form with a `foto` (or `file`) field holding the image.
pub async fn upload_photo(
    State(state): State<AppState>,
    AlunoId(id): AlunoId,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().unwrap_or("").to_string();
        if !PHOTO_FIELDS.contains(&name.as_str()) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("campo foto sem nome de arquivo".into()))?;
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((filename, data.to_vec()));
        break;
    }
    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("missing 'foto' field in multipart body".into()))?;
    let reference = state.alunos.attach_photo(id, &filename, &bytes).await?;
    let (status, Json(mut body)) = response::message(PHOTO_MESSAGE);
    body.foto = Some(reference);
    Ok((status, Json(body)))
}
