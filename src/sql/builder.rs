//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for the `alunos` table.

use crate::config::{AlunoColumn, COLUMNS, PK_COLUMN, TABLE_NAME};
use crate::error::AppError;
use crate::model::{AlunoFilter, AlunoPatch, NewAluno};
use crate::sql::BindValue;

/// Quote identifier for PostgreSQL (safe: only from the column catalog).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Returns the placeholder for the pushed value (`$1`, `$2`, ...).
    fn push_param(&mut self, v: BindValue) -> String {
        self.params.push(v);
        format!("${}", self.params.len())
    }
}

/// SELECT list: id followed by every catalog column.
fn select_column_list() -> String {
    std::iter::once(PK_COLUMN)
        .chain(COLUMNS.iter().map(|c| c.name))
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn select_by_id(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(BindValue::BigInt(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(),
        quoted(TABLE_NAME),
        quoted(PK_COLUMN),
        ph
    );
    q
}

/// SELECT list with optional literal substring filter on nome (`%` and `_` match themselves), ORDER BY id, optional LIMIT/OFFSET.
pub fn select_list(filter: &AlunoFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = match filter.nome_term() {
        Some(term) => {
            let ph = q.push_param(BindValue::Text(term.to_string()));
            format!(" WHERE strpos({}, {}) > 0", quoted(AlunoColumn::Nome.name()), ph)
        }
        None => String::new(),
    };
    let limit_clause = match filter.effective_limit() {
        Some(n) => format!(" LIMIT {}", q.push_param(BindValue::BigInt(n.into()))),
        None => String::new(),
    };
    let offset_clause = match filter.offset {
        Some(n) => format!(" OFFSET {}", q.push_param(BindValue::BigInt(n.into()))),
        None => String::new(),
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}{}{}",
        select_column_list(),
        quoted(TABLE_NAME),
        where_clause,
        quoted(PK_COLUMN),
        limit_clause,
        offset_clause
    );
    q
}

/// INSERT every catalog column; the id comes back through RETURNING.
pub fn insert(aluno: &NewAluno) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (column, value) in aluno.values() {
        cols.push(quoted(column.name()));
        placeholders.push(q.push_param(value));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(TABLE_NAME),
        cols.join(", "),
        placeholders.join(", "),
        quoted(PK_COLUMN)
    );
    q
}

/// UPDATE by id: one SET assignment per patched column, id bound last.
pub fn update(id: i64, patch: &AlunoPatch) -> Result<QueryBuf, AppError> {
    if patch.is_empty() {
        return Err(AppError::Validation("Nenhum dado enviado".into()));
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(patch.len());
    for (column, value) in patch.iter() {
        let ph = q.push_param(value.clone());
        sets.push(format!("{} = {}", quoted(column.name()), ph));
    }
    let id_ph = q.push_param(BindValue::BigInt(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quoted(TABLE_NAME),
        sets.join(", "),
        quoted(PK_COLUMN),
        id_ph
    );
    Ok(q)
}

pub fn delete(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(BindValue::BigInt(id));
    q.sql = format!("DELETE FROM {} WHERE {} = {}", quoted(TABLE_NAME), quoted(PK_COLUMN), ph);
    q
}
