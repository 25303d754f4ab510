//! CPF API handlers
//!
//! HTTP entry point for the validate-or-generate exchange. Responses are
//! plain text: `Valid`/`Invalid` for a supplied number, or a freshly
//! generated CPF when the query parameter is absent or empty.

use crate::services::cpf::CpfService;
use axum::extract::Query;
use serde::Deserialize;
use tracing::info;

/// Query parameters accepted by the CPF endpoint
#[derive(Debug, Deserialize)]
pub struct CpfQuery {
    /// Candidate CPF, free-form (may carry dots and dashes)
    pub cpf: Option<String>,
}

/// GET|POST /api/cpf - Validate the supplied `cpf` query parameter, or
/// generate a fresh valid CPF when the parameter is absent or empty
pub async fn validate_or_generate(Query(query): Query<CpfQuery>) -> String {
    match query.cpf.as_deref() {
        Some(cpf) if !cpf.is_empty() => {
            let valid = CpfService::is_valid(cpf);
            info!(valid, "Validated CPF from query string");
            if valid { "Valid" } else { "Invalid" }.to_string()
        }
        _ => {
            let generated = CpfService::generate();
            info!("No CPF supplied, generated a fresh one");
            format!("Generated CPF: {}", generated)
        }
    }
}
