// src/handlers/files.rs

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::{common::error::AppError, config::AppState};

/// `attachment` com nome ASCII de reserva e o nome original em `filename*`.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' { c } else { '_' })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

/// Resposta PDF pronta para download.
pub fn pdf_response(bytes: Vec<u8>, file_name: &str) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&content_disposition(file_name))
        .map_err(|e| AppError::InternalServerError(e.into()))?;

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    Ok((headers, bytes).into_response())
}

// Rota pública: quem autoriza é a assinatura do token
#[utoipa::path(
    get,
    path = "/api/files/{token}",
    tag = "Files",
    params(("token" = String, Path, description = "Token do link assinado")),
    responses(
        (status = 200, description = "Arquivo PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 401, description = "Link inválido ou expirado"),
        (status = 404, description = "Arquivo não encontrado")
    )
)]
pub async fn download_file(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, AppError> {
    let grant = app_state.storage_service.verify(&token)?;
    let bytes = app_state.storage_service.storage().get(&grant.key).await?;

    pdf_response(bytes, &grant.file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_plain_names() {
        assert_eq!(
            content_disposition("laudo.pdf"),
            "attachment; filename=\"laudo.pdf\"; filename*=UTF-8''laudo.pdf"
        );
    }

    #[test]
    fn encodes_accents_and_spaces() {
        let value = content_disposition("licença sanitária.pdf");
        assert!(value.starts_with("attachment; filename=\"licen_a sanit_ria.pdf\""));
        assert!(value.ends_with("filename*=UTF-8''licen%C3%A7a%20sanit%C3%A1ria.pdf"));
        assert!(HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn encodes_quotes_and_separators() {
        let value = content_disposition("a\"b;c/d.pdf");
        assert!(value.starts_with("attachment; filename=\"a_b;c/d.pdf\""));
        assert!(value.ends_with("filename*=UTF-8''a%22b%3Bc%2Fd.pdf"));
    }

    #[test]
    fn pdf_response_sets_headers() {
        let response = pdf_response(b"%PDF-1.4".to_vec(), "relatorio.pdf").unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("relatorio.pdf"));
    }
}
