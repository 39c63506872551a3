// src/handlers/reminders.rs

use axum::{
    extract::{Path, Query, State},
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
    models::reminders::{CompletedReminder, Reminder, ReminderFilter, ReminderPayload},
};

#[utoipa::path(
    post,
    path = "/api/reminders",
    tag = "Reminders",
    request_body = ReminderPayload,
    responses((status = 201, description = "Lembrete criado", body = Reminder)),
    security(("api_jwt" = []))
)]
pub async fn create_reminder(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ReminderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let reminder = app_state.reminder_service.create(user.id, &payload).await?;

    Ok((StatusCode::CREATED, Json(reminder)))
}

#[utoipa::path(
    get,
    path = "/api/reminders",
    tag = "Reminders",
    params(ReminderFilter),
    responses((status = 200, description = "Lembretes", body = Vec<Reminder>)),
    security(("api_jwt" = []))
)]
pub async fn list_reminders(
    State(app_state): State<AppState>,
    Query(filter): Query<ReminderFilter>,
) -> Result<Json<Vec<Reminder>>, AppError> {
    Ok(Json(app_state.reminder_service.list(&filter).await?))
}

#[utoipa::path(
    put,
    path = "/api/reminders/{id}",
    tag = "Reminders",
    request_body = ReminderPayload,
    params(("id" = Uuid, Path, description = "ID do lembrete")),
    responses(
        (status = 200, description = "Lembrete atualizado", body = Reminder),
        (status = 404, description = "Lembrete não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_reminder(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReminderPayload>,
) -> Result<Json<Reminder>, AppError> {
    payload.validate()?;

    Ok(Json(app_state.reminder_service.update(user.id, id, &payload).await?))
}

// Conclui e, se for recorrente, agenda a próxima ocorrência
#[utoipa::path(
    post,
    path = "/api/reminders/{id}/complete",
    tag = "Reminders",
    params(("id" = Uuid, Path, description = "ID do lembrete")),
    responses(
        (status = 200, description = "Lembrete concluído", body = CompletedReminder),
        (status = 400, description = "Lembrete já concluído"),
        (status = 404, description = "Lembrete não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_reminder(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CompletedReminder>, AppError> {
    Ok(Json(app_state.reminder_service.complete(user.id, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/reminders/{id}",
    tag = "Reminders",
    params(("id" = Uuid, Path, description = "ID do lembrete")),
    responses(
        (status = 204, description = "Lembrete removido"),
        (status = 404, description = "Lembrete não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_reminder(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.reminder_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
