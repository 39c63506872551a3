// src/handlers/residents.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        dashboard::{BirthdayEntry, BirthdayQuery},
        residents::{Resident, ResidentFilter, ResidentPayload},
    },
};

#[utoipa::path(
    post,
    path = "/api/residents",
    tag = "Residents",
    request_body = ResidentPayload,
    responses(
        (status = 201, description = "Idoso cadastrado", body = Resident),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CPF já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_resident(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ResidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resident = app_state.resident_service.create(user.id, payload).await?;

    Ok((StatusCode::CREATED, Json(resident)))
}

#[utoipa::path(
    get,
    path = "/api/residents",
    tag = "Residents",
    params(ResidentFilter),
    responses((status = 200, description = "Idosos", body = Vec<Resident>)),
    security(("api_jwt" = []))
)]
pub async fn list_residents(
    State(app_state): State<AppState>,
    Query(filter): Query<ResidentFilter>,
) -> Result<Json<Vec<Resident>>, AppError> {
    Ok(Json(app_state.resident_service.list(&filter).await?))
}

#[utoipa::path(
    get,
    path = "/api/residents/{resident_id}",
    tag = "Residents",
    params(("resident_id" = Uuid, Path, description = "ID do idoso")),
    responses(
        (status = 200, description = "Idoso", body = Resident),
        (status = 404, description = "Idoso não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_resident(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Resident>, AppError> {
    Ok(Json(app_state.resident_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/residents/{resident_id}",
    tag = "Residents",
    request_body = ResidentPayload,
    params(("resident_id" = Uuid, Path, description = "ID do idoso")),
    responses(
        (status = 200, description = "Idoso atualizado", body = Resident),
        (status = 404, description = "Idoso não encontrado"),
        (status = 409, description = "CPF já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_resident(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResidentPayload>,
) -> Result<Json<Resident>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.resident_service.update(user.id, id, payload).await?))
}

// Saída da instituição (exclusão lógica)
#[utoipa::path(
    delete,
    path = "/api/residents/{resident_id}",
    tag = "Residents",
    params(("resident_id" = Uuid, Path, description = "ID do idoso")),
    responses(
        (status = 200, description = "Saída registrada", body = Resident),
        (status = 404, description = "Idoso não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn discharge_resident(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Resident>, AppError> {
    Ok(Json(app_state.resident_service.discharge(user.id, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/residents/birthdays",
    tag = "Residents",
    params(BirthdayQuery),
    responses((status = 200, description = "Próximos aniversariantes", body = Vec<BirthdayEntry>)),
    security(("api_jwt" = []))
)]
pub async fn resident_birthdays(
    State(app_state): State<AppState>,
    Query(query): Query<BirthdayQuery>,
) -> Result<Json<Vec<BirthdayEntry>>, AppError> {
    let today = Utc::now().date_naive();
    Ok(Json(app_state.resident_service.upcoming_birthdays(today, query.window()).await?))
}
