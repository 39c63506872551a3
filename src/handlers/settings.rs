// src/handlers/settings.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        roles::{AdminOnly, RequireRole},
    },
    models::settings::{InstitutionSettings, UpdateSettingsRequest},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses((status = 200, description = "Dados da instituição", body = InstitutionSettings)),
    security(("api_jwt" = []))
)]
pub async fn get_settings(State(app_state): State<AppState>) -> Result<Json<InstitutionSettings>, AppError> {
    Ok(Json(app_state.settings_service.get().await?))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Dados atualizados", body = InstitutionSettings),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<InstitutionSettings>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.settings_service.update(user.id, payload).await?))
}
