// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{BirthdayEntry, BirthdayQuery, DashboardSummary},
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores do painel", body = DashboardSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(State(app_state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    let today = Utc::now().date_naive();
    Ok(Json(app_state.dashboard_service.get_summary(today).await?))
}

// Funcionários e idosos juntos
#[utoipa::path(
    get,
    path = "/api/dashboard/birthdays",
    tag = "Dashboard",
    params(BirthdayQuery),
    responses((status = 200, description = "Próximos aniversariantes", body = Vec<BirthdayEntry>)),
    security(("api_jwt" = []))
)]
pub async fn get_birthdays(
    State(app_state): State<AppState>,
    Query(query): Query<BirthdayQuery>,
) -> Result<Json<Vec<BirthdayEntry>>, AppError> {
    let today = Utc::now().date_naive();
    Ok(Json(app_state.dashboard_service.birthdays(today, query.window()).await?))
}
