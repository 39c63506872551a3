// src/handlers/donations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::donations::{Donation, DonationFilter, DonationPayload},
};

// Validação padrão + regras que dependem do tipo da doação
fn validate_donation(payload: &DonationPayload) -> Result<(), AppError> {
    payload.validate()?;
    payload.validate_consistency().map_err(|(field, e)| {
        let mut errors = ValidationErrors::new();
        errors.add(field, e);
        AppError::ValidationError(errors)
    })
}

#[utoipa::path(
    post,
    path = "/api/donations",
    tag = "Donations",
    request_body = DonationPayload,
    responses(
        (status = 201, description = "Doação registrada", body = Donation),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_donation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<DonationPayload>,
) -> Result<impl IntoResponse, AppError> {
    validate_donation(&payload)?;

    let donation = app_state.donation_service.create(user.id, payload).await?;

    Ok((StatusCode::CREATED, Json(donation)))
}

#[utoipa::path(
    get,
    path = "/api/donations",
    tag = "Donations",
    params(DonationFilter),
    responses((status = 200, description = "Doações", body = Vec<Donation>)),
    security(("api_jwt" = []))
)]
pub async fn list_donations(
    State(app_state): State<AppState>,
    Query(filter): Query<DonationFilter>,
) -> Result<Json<Vec<Donation>>, AppError> {
    Ok(Json(app_state.donation_service.list(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/donations/{id}",
    tag = "Donations",
    params(("id" = Uuid, Path, description = "ID da doação")),
    responses(
        (status = 200, description = "Doação", body = Donation),
        (status = 404, description = "Doação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_donation(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Donation>, AppError> {
    Ok(Json(app_state.donation_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/donations/{id}",
    tag = "Donations",
    request_body = DonationPayload,
    params(("id" = Uuid, Path, description = "ID da doação")),
    responses(
        (status = 200, description = "Doação atualizada", body = Donation),
        (status = 404, description = "Doação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_donation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DonationPayload>,
) -> Result<Json<Donation>, AppError> {
    validate_donation(&payload)?;

    Ok(Json(app_state.donation_service.update(user.id, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/donations/{id}",
    tag = "Donations",
    params(("id" = Uuid, Path, description = "ID da doação")),
    responses(
        (status = 204, description = "Doação removida"),
        (status = 404, description = "Doação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_donation(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.donation_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
