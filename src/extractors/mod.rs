//! Request extractors.

mod aluno_id;
pub use aluno_id::{parse_id, AlunoId};
