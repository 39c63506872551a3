use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use convert_case::{Case, Casing};
use serde_json::json;
use thiserror::Error;

use crate::common::format::FormatError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Dados inválidos: {0}")]
    InvalidInput(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Não encontrado: {0}")]
    NotFound(String),

    // Estado atual do registro não permite a operação
    #[error("{0}")]
    Conflict(String),

    // Violação de índice único (CPF, e-mail, documento...)
    #[error("{0}")]
    UniqueConstraintViolation(String),

    // Registro ainda referenciado por outro (FK RESTRICT)
    #[error("{0}")]
    ReferenceViolation(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro no armazenamento de arquivos: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Erro ao gerar relatório: {0}")]
    ReportError(String),
}

// Dados que passaram na validação mas não puderam ser normalizados
impl From<FormatError> for AppError {
    fn from(e: FormatError) -> Self {
        AppError::InvalidInput(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    // Mesmo nome de campo do JSON recebido
                details.insert(field.to_case(Case::Camel), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string()),
            AppError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} não encontrado(a).", what)),
            AppError::UniqueConstraintViolation(message) => (StatusCode::CONFLICT, message),
            AppError::ReferenceViolation(message) => (StatusCode::CONFLICT, message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),

            // Todo o resto vira 500. O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("corpo legível");
        serde_json::from_slice(&bytes).expect("json válido")
    }

    #[tokio::test]
    async fn validation_error_lists_fields() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("required");
        err.message = Some("O nome é obrigatório.".into());
        errors.add("fullName", err);

        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["details"]["fullName"][0], "O nome é obrigatório.");
    }

    #[tokio::test]
    async fn detail_keys_follow_json_field_names() {
        let mut errors = ValidationErrors::new();
        errors.add("full_name", ValidationError::new("length"));
        errors.add("birth_date", ValidationError::new("required"));
        errors.add("dueDay", ValidationError::new("range"));

        let body = body_json(AppError::ValidationError(errors).into_response()).await;
        let details = body["details"].as_object().unwrap();
        let mut keys: Vec<&str> = details.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["birthDate", "dueDay", "fullName"]);
    }

    #[tokio::test]
    async fn conflicts_map_to_409() {
        let response =
            AppError::UniqueConstraintViolation("CPF já cadastrado.".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"], "CPF já cadastrado.");

        let response = AppError::Conflict("Lançamento já baixado.".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = AppError::InternalServerError(anyhow::anyhow!("segredo")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Ocorreu um erro inesperado.");
    }

    #[test]
    fn not_found_names_the_entity() {
        let response = AppError::NotFound("Funcionário".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
