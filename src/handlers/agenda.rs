// src/handlers/agenda.rs

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
    models::agenda::{AgendaEvent, AgendaEventPayload, AgendaFilter},
};

fn validate_event(payload: &AgendaEventPayload) -> Result<(), AppError> {
    payload.validate()?;
    payload.validate_consistency().map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("endsAt", e);
        AppError::ValidationError(errors)
    })
}

#[utoipa::path(
    post,
    path = "/api/agenda",
    tag = "Agenda",
    request_body = AgendaEventPayload,
    responses(
        (status = 201, description = "Evento criado", body = AgendaEvent),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<AgendaEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    validate_event(&payload)?;

    let event = app_state.agenda_service.create(user.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/agenda",
    tag = "Agenda",
    params(AgendaFilter),
    responses((status = 200, description = "Eventos do período", body = Vec<AgendaEvent>)),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    Query(filter): Query<AgendaFilter>,
) -> Result<Json<Vec<AgendaEvent>>, AppError> {
    Ok(Json(app_state.agenda_service.list(&filter).await?))
}

#[utoipa::path(
    put,
    path = "/api/agenda/{id}",
    tag = "Agenda",
    request_body = AgendaEventPayload,
    params(("id" = Uuid, Path, description = "ID do evento")),
    responses(
        (status = 200, description = "Evento atualizado", body = AgendaEvent),
        (status = 404, description = "Evento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AgendaEventPayload>,
) -> Result<Json<AgendaEvent>, AppError> {
    validate_event(&payload)?;

    Ok(Json(app_state.agenda_service.update(user.id, id, &payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/agenda/{id}",
    tag = "Agenda",
    params(("id" = Uuid, Path, description = "ID do evento")),
    responses(
        (status = 204, description = "Evento removido"),
        (status = 404, description = "Evento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.agenda_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
