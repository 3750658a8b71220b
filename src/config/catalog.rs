//! Column catalog for the `alunos` table: the only source of identifiers that reach SQL text.

use std::fmt;

pub const TABLE_NAME: &str = "alunos";
pub const PK_COLUMN: &str = "id";

/// Mutable columns of a student record, in table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlunoColumn {
    Nome,
    Email,
    Telefone,
    Sexo,
    DataNascimento,
    Faixa,
    Grau,
    Plano,
    Foto,
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnInfo {
    pub column: AlunoColumn,
    /// Name as it appears in JSON bodies and in the table.
    pub name: &'static str,
    pub required: bool,
    pub kind: ColumnKind,
}

/// Value type of a column; decides how JSON values are parsed before binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// `YYYY-MM-DD`, stored as DATE.
    Date,
}

pub const COLUMNS: &[ColumnInfo] = &[
    ColumnInfo { column: AlunoColumn::Nome, name: "nome", required: true, kind: ColumnKind::Text },
    ColumnInfo { column: AlunoColumn::Email, name: "email", required: false, kind: ColumnKind::Text },
    ColumnInfo { column: AlunoColumn::Telefone, name: "telefone", required: true, kind: ColumnKind::Text },
    ColumnInfo { column: AlunoColumn::Sexo, name: "sexo", required: true, kind: ColumnKind::Text },
    ColumnInfo { column: AlunoColumn::DataNascimento, name: "dataNascimento", required: true, kind: ColumnKind::Date },
    ColumnInfo { column: AlunoColumn::Faixa, name: "faixa", required: true, kind: ColumnKind::Text },
    ColumnInfo { column: AlunoColumn::Grau, name: "grau", required: true, kind: ColumnKind::Text },
    ColumnInfo { column: AlunoColumn::Plano, name: "plano", required: true, kind: ColumnKind::Text },
    ColumnInfo { column: AlunoColumn::Foto, name: "foto", required: false, kind: ColumnKind::Text },
];

impl AlunoColumn {
    pub fn info(self) -> &'static ColumnInfo {
        // COLUMNS is declared in enum order.
        &COLUMNS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn is_required(self) -> bool {
        self.info().required
    }

    pub fn kind(self) -> ColumnKind {
        self.info().kind
    }

    pub fn from_name(name: &str) -> Option<Self> {
        COLUMNS.iter().find(|c| c.name == name).map(|c| c.column)
    }

    pub fn required() -> impl Iterator<Item = AlunoColumn> {
        COLUMNS.iter().filter(|c| c.required).map(|c| c.column)
    }
}

impl fmt::Display for AlunoColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
