// src/handlers/licenses.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        health::SignedLink,
        licenses::{LicensePayload, LicenseView},
    },
};

#[utoipa::path(
    post,
    path = "/api/licenses",
    tag = "Licenses",
    request_body = LicensePayload,
    responses(
        (status = 201, description = "Licença cadastrada", body = LicenseView),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_license(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<LicensePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let license = app_state.license_service.create(user.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(license)))
}

#[utoipa::path(
    get,
    path = "/api/licenses",
    tag = "Licenses",
    responses((status = 200, description = "Licenças com situação de validade", body = Vec<LicenseView>)),
    security(("api_jwt" = []))
)]
pub async fn list_licenses(State(app_state): State<AppState>) -> Result<Json<Vec<LicenseView>>, AppError> {
    Ok(Json(app_state.license_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/licenses/{id}",
    tag = "Licenses",
    params(("id" = Uuid, Path, description = "ID da licença")),
    responses(
        (status = 200, description = "Licença", body = LicenseView),
        (status = 404, description = "Licença não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_license(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LicenseView>, AppError> {
    Ok(Json(app_state.license_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/licenses/{id}",
    tag = "Licenses",
    request_body = LicensePayload,
    params(("id" = Uuid, Path, description = "ID da licença")),
    responses(
        (status = 200, description = "Licença atualizada", body = LicenseView),
        (status = 404, description = "Licença não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_license(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LicensePayload>,
) -> Result<Json<LicenseView>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.license_service.update(user.id, id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/licenses/{id}",
    tag = "Licenses",
    params(("id" = Uuid, Path, description = "ID da licença")),
    responses(
        (status = 204, description = "Licença removida"),
        (status = 404, description = "Licença não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_license(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.license_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Substitui o PDF anterior, se houver
#[utoipa::path(
    put,
    path = "/api/licenses/{id}/document",
    tag = "Licenses",
    request_body(content = Vec<u8>, description = "Arquivo PDF", content_type = "application/pdf"),
    params(("id" = Uuid, Path, description = "ID da licença")),
    responses(
        (status = 200, description = "Documento anexado", body = LicenseView),
        (status = 400, description = "O arquivo não é um PDF"),
        (status = 404, description = "Licença não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_license_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<LicenseView>, AppError> {
    Ok(Json(app_state.license_service.upload_document(user.id, id, &body).await?))
}

#[utoipa::path(
    get,
    path = "/api/licenses/{id}/document/link",
    tag = "Licenses",
    params(("id" = Uuid, Path, description = "ID da licença")),
    responses(
        (status = 200, description = "Link temporário de download", body = SignedLink),
        (status = 404, description = "Licença sem documento")
    ),
    security(("api_jwt" = []))
)]
pub async fn license_document_link(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SignedLink>, AppError> {
    Ok(Json(app_state.license_service.document_link(id).await?))
}
