use std::{collections::BTreeMap, sync::OnceLock};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Entrada malformada detectada antes de qualquer escrita
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} não encontrado")]
    ResourceNotFound(String),

    #[error("{0}")]
    Conflict(String),

    // Remaneio com ids inexistentes ou fora do status CONFERIR
    #[error("Ids inválidos para o remaneio: {0:?}")]
    InvalidSequence(Vec<i64>),

    #[error("Token inválido")]
    InvalidToken,

    // Falhas de banco (conexão, constraint não mapeada, etc.)
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

static DIAGNOSTICO: OnceLock<bool> = OnceLock::new();

/// Liga o modo diagnóstico (detalhes internos nas respostas 500).
/// Só tem efeito na primeira chamada.
pub fn enable_diagnostics(enabled: bool) {
    let _ = DIAGNOSTICO.set(enabled);
}

fn diagnostics_enabled() -> bool {
    DIAGNOSTICO.get().copied().unwrap_or(false)
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidSequence(_) => StatusCode::BAD_REQUEST,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                collect_validation_details("", errors, &mut details);
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::InvalidSequence(ids) => json!({
                "error": "Alguns ids são inválidos ou não estão no status CONFERIR.",
                "invalidos": ids,
            }),
            AppError::InvalidInput(_) | AppError::ResourceNotFound(_) | AppError::Conflict(_) => {
                json!({ "error": self.to_string() })
            }
            AppError::InvalidToken => {
                json!({ "error": "Token de autenticação inválido ou ausente." })
            }

            // Erros de infraestrutura viram 500. O detalhe vai para o log
            // e só aparece na resposta em modo diagnóstico.
            e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                if diagnostics_enabled() {
                    json!({ "error": "Ocorreu um erro inesperado.", "detalhe": e.to_string() })
                } else {
                    json!({ "error": "Ocorreu um erro inesperado." })
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

// Achata os erros aninhados em caminhos como "itens[0].produto_id".
fn collect_validation_details(
    prefixo: &str,
    errors: &ValidationErrors,
    details: &mut BTreeMap<String, Vec<String>>,
) {
    for (campo, kind) in errors.errors() {
        let caminho = if prefixo.is_empty() {
            campo.to_string()
        } else {
            format!("{}.{}", prefixo, campo)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors.iter().map(|e| match &e.message {
                    Some(m) => m.to_string(),
                    None => e.code.to_string(),
                });
                details.entry(caminho).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_validation_details(&caminho, inner, details);
            }
            ValidationErrorsKind::List(itens) => {
                for (pos, inner) in itens {
                    collect_validation_details(&format!("{}[{}]", caminho, pos), inner, details);
                }
            }
        }
    }
}
