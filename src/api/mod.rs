//! API module
//!
//! Contains HTTP request handlers for the CPF endpoint

pub mod cpf;
