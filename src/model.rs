//! Student record and the typed inputs accepted by the store.

use crate::config::AlunoColumn;
use crate::error::AppError;
use crate::sql::BindValue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Aluno {
    pub id: i64,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: String,
    pub sexo: String,
    #[serde(rename = "dataNascimento")]
    #[sqlx(rename = "dataNascimento")]
    pub data_nascimento: NaiveDate,
    pub faixa: String,
    pub grau: String,
    pub plano: String,
    pub foto: Option<String>,
}

/// Validated create input; `id` is assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAluno {
    pub nome: String,
    pub email: Option<String>,
    pub telefone: String,
    pub sexo: String,
    pub data_nascimento: NaiveDate,
    pub faixa: String,
    pub grau: String,
    pub plano: String,
    pub foto: Option<String>,
}

impl NewAluno {
    pub fn into_aluno(self, id: i64) -> Aluno {
        Aluno {
            id,
            nome: self.nome,
            email: self.email,
            telefone: self.telefone,
            sexo: self.sexo,
            data_nascimento: self.data_nascimento,
            faixa: self.faixa,
            grau: self.grau,
            plano: self.plano,
            foto: self.foto,
        }
    }

    /// Values in catalog order, one per column.
    pub fn values(&self) -> Vec<(AlunoColumn, BindValue)> {
        let opt = |v: &Option<String>| v.clone().map(BindValue::Text).unwrap_or(BindValue::Null);
        vec![
            (AlunoColumn::Nome, BindValue::Text(self.nome.clone())),
            (AlunoColumn::Email, opt(&self.email)),
            (AlunoColumn::Telefone, BindValue::Text(self.telefone.clone())),
            (AlunoColumn::Sexo, BindValue::Text(self.sexo.clone())),
            (AlunoColumn::DataNascimento, BindValue::Date(self.data_nascimento)),
            (AlunoColumn::Faixa, BindValue::Text(self.faixa.clone())),
            (AlunoColumn::Grau, BindValue::Text(self.grau.clone())),
            (AlunoColumn::Plano, BindValue::Text(self.plano.clone())),
            (AlunoColumn::Foto, opt(&self.foto)),
        ]
    }
}

/// A non-empty set of column assignments for a partial update, kept in catalog order.
#[derive(Clone, Debug, PartialEq)]
pub struct AlunoPatch {
    fields: BTreeMap<AlunoColumn, BindValue>,
}

impl AlunoPatch {
    pub fn new(fields: BTreeMap<AlunoColumn, BindValue>) -> Result<Self, AppError> {
        if fields.is_empty() {
            return Err(AppError::Validation("Nenhum dado enviado".into()));
        }
        Ok(AlunoPatch { fields })
    }

    pub fn single(column: AlunoColumn, value: BindValue) -> Self {
        AlunoPatch {
            fields: BTreeMap::from([(column, value)]),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AlunoColumn, &BindValue)> {
        self.fields.iter().map(|(c, v)| (*c, v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Aluno {
    /// Apply one validated assignment in memory.
    pub fn set(&mut self, column: AlunoColumn, value: &BindValue) -> Result<(), AppError> {
        let text = || match value {
            BindValue::Text(s) => Ok(s.clone()),
            other => Err(AppError::Validation(format!("{}: unexpected value {:?}", column, other))),
        };
        let optional_text = || match value {
            BindValue::Null => Ok(None),
            _ => text().map(Some),
        };
        match column {
            AlunoColumn::Nome => self.nome = text()?,
            AlunoColumn::Email => self.email = optional_text()?,
            AlunoColumn::Telefone => self.telefone = text()?,
            AlunoColumn::Sexo => self.sexo = text()?,
            AlunoColumn::DataNascimento => match value {
                BindValue::Date(d) => self.data_nascimento = *d,
                other => {
                    return Err(AppError::Validation(format!("{}: unexpected value {:?}", column, other)))
                }
            },
            AlunoColumn::Faixa => self.faixa = text()?,
            AlunoColumn::Grau => self.grau = text()?,
            AlunoColumn::Plano => self.plano = text()?,
            AlunoColumn::Foto => self.foto = optional_text()?,
        }
        Ok(())
    }
}

/// List filter: substring match on `nome` plus optional paging.
#[derive(Clone, Debug, Default)]
pub struct AlunoFilter {
    pub nome: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub const MAX_LIST_LIMIT: u32 = 1000;

impl AlunoFilter {
    /// The search term, or None when absent or blank.
    pub fn nome_term(&self) -> Option<&str> {
        self.nome.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn effective_limit(&self) -> Option<u32> {
        self.limit.map(|n| n.min(MAX_LIST_LIMIT))
    }
}

#[cfg(test)]
pub(crate) fn sample_new_aluno() -> NewAluno {
    NewAluno {
        nome: "Ana".into(),
        email: None,
        telefone: "123".into(),
        sexo: "F".into(),
        data_nascimento: NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"),
        faixa: "branca".into(),
        grau: "1".into(),
        plano: "mensal".into(),
        foto: None,
    }
}
