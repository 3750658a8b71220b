//! AlunoService: student CRUD on top of the record store.

mod alunos;
mod photos;
mod validation;
pub use alunos::AlunoService;
pub use photos::{allowed_extension, sanitize_filename, PhotoStore, ALLOWED_EXTENSIONS, PUBLIC_PREFIX};
pub use validation::RequestValidator;
