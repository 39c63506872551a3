// src/handlers/activity.rs

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    common::{db_utils::field_error, error::AppError},
    config::AppState,
    models::activity::{ActivityCursor, ActivityFeed, ActivityQuery},
};

// Feed de atividades. Sem `after` devolve os mais recentes; com `after`
// devolve o que veio depois do cursor, em ordem, para o polling.
#[utoipa::path(
    get,
    path = "/api/activity",
    tag = "Activity",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Eventos e cursor para a próxima consulta", body = ActivityFeed),
        (status = 400, description = "Cursor inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_activity(
    State(app_state): State<AppState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ActivityFeed>, AppError> {
    let limit = query.effective_limit();

    let feed = match query.after.as_deref() {
        Some(raw) => {
            let after = ActivityCursor::parse(raw)
                .ok_or_else(|| field_error("after", "cursor", "Cursor inválido."))?;
            let items = app_state.audit_repo.list_after(after, limit).await?;
            let next_cursor = items
                .last()
                .map(|log| log.cursor.clone())
                .unwrap_or_else(|| after.to_string());
            ActivityFeed { items, next_cursor }
        }
        None => {
            let (items, cursor) = app_state.audit_repo.list_recent(query.since, limit).await?;
            ActivityFeed { items, next_cursor: cursor.to_string() }
        }
    };

    Ok(Json(feed))
}
