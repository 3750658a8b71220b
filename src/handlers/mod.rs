//! HTTP handlers for aluno CRUD and the intake page.

pub mod alunos;
pub mod pages;
