//! Request validation against the column catalog.

use crate::config::{AlunoColumn, ColumnKind};
use crate::error::AppError;
use crate::model::{AlunoPatch, NewAluno};
use crate::sql::BindValue;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body. Every required key must be present and non-null; unknown keys are ignored.
    pub fn validate_create(body: &Value) -> Result<NewAluno, AppError> {
        let body = as_object(body)?;
        let missing: Vec<&str> = AlunoColumn::required()
            .filter(|c| body.get(c.name()).map(Value::is_null).unwrap_or(true))
            .map(AlunoColumn::name)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!("Dados incompletos: {}", missing.join(", "))));
        }

        let mut values = BTreeMap::new();
        for (key, raw) in body {
            if let Some(column) = AlunoColumn::from_name(key) {
                values.insert(column, field_value(column, raw)?);
            }
        }
        let text = |c: AlunoColumn| match values.get(&c) {
            Some(BindValue::Text(s)) => s.clone(),
            _ => String::new(),
        };
        let optional = |c: AlunoColumn| match values.get(&c) {
            Some(BindValue::Text(s)) => Some(s.clone()),
            _ => None,
        };
        let data_nascimento = match values.get(&AlunoColumn::DataNascimento) {
            Some(BindValue::Date(d)) => *d,
            _ => return Err(AppError::Validation("dataNascimento is required".into())),
        };
        Ok(NewAluno {
            nome: text(AlunoColumn::Nome),
            email: optional(AlunoColumn::Email),
            telefone: text(AlunoColumn::Telefone),
            sexo: text(AlunoColumn::Sexo),
            data_nascimento,
            faixa: text(AlunoColumn::Faixa),
            grau: text(AlunoColumn::Grau),
            plano: text(AlunoColumn::Plano),
            foto: optional(AlunoColumn::Foto),
        })
    }

    /// Validate a partial update body. Keys must all be catalog columns; at least one is required.
    pub fn validate_patch(body: &Value) -> Result<AlunoPatch, AppError> {
        let body = match body {
            Value::Object(m) => m,
            Value::Null => return Err(AppError::Validation("Nenhum dado enviado".into())),
            _ => return Err(AppError::Validation("body must be a JSON object".into())),
        };
        let unknown: Vec<&str> = body
            .keys()
            .filter(|k| AlunoColumn::from_name(k).is_none())
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::Validation(format!("campos desconhecidos: {}", unknown.join(", "))));
        }
        let mut fields = BTreeMap::new();
        for (key, raw) in body {
            if let Some(column) = AlunoColumn::from_name(key) {
                fields.insert(column, field_value(column, raw)?);
            }
        }
        AlunoPatch::new(fields)
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, AppError> {
    match body {
        Value::Object(m) => Ok(m),
        Value::Null => Err(AppError::Validation("Dados incompletos".into())),
        _ => Err(AppError::Validation("body must be a JSON object".into())),
    }
}

/// Convert one JSON value for `column`. Numbers are kept in their textual form.
pub fn field_value(column: AlunoColumn, raw: &Value) -> Result<BindValue, AppError> {
    let text = match raw {
        Value::Null if column.is_required() => {
            return Err(AppError::Validation(format!("{} cannot be null", column)));
        }
        Value::Null => return Ok(BindValue::Null),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            return Err(AppError::Validation(format!("{} must be a string", column)));
        }
    };
    match column.kind() {
        ColumnKind::Text => Ok(BindValue::Text(text)),
        ColumnKind::Date => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map(BindValue::Date)
            .map_err(|_| AppError::Validation(format!("{} must be a date (YYYY-MM-DD)", column))),
    }
}
