// src/db/agenda_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::agenda::{AgendaEvent, AgendaEventPayload, AgendaFilter},
};

const EVENT_REFERENCE: &str = "Idoso ou funcionário inexistente.";

#[derive(Clone)]
pub struct AgendaRepository {
    pool: PgPool,
}

impl AgendaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &AgendaEventPayload) -> Result<AgendaEvent, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let event = sqlx::query_as::<_, AgendaEvent>(
            r#"
            INSERT INTO agenda_events (
                title, description, starts_at, ends_at, location, kind, resident_id, employee_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(payload.title.trim())
        .bind(&payload.description)
        .bind(payload.starts_at)
        .bind(payload.ends_at)
        .bind(&payload.location)
        .bind(payload.kind)
        .bind(payload.resident_id)
        .bind(payload.employee_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Evento duplicado.", EVENT_REFERENCE))?;

        Ok(event)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &AgendaEventPayload,
    ) -> Result<AgendaEvent, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AgendaEvent>(
            r#"
            UPDATE agenda_events SET
                title = $2, description = $3, starts_at = $4, ends_at = $5,
                location = $6, kind = $7, resident_id = $8, employee_id = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.title.trim())
        .bind(&payload.description)
        .bind(payload.starts_at)
        .bind(payload.ends_at)
        .bind(&payload.location)
        .bind(payload.kind)
        .bind(payload.resident_id)
        .bind(payload.employee_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Evento duplicado.", EVENT_REFERENCE))?
        .ok_or_else(|| AppError::NotFound("Evento".into()))
    }

    // Eventos que se sobrepõem ao intervalo
    pub async fn list(&self, filter: &AgendaFilter) -> Result<Vec<AgendaEvent>, AppError> {
        let events = sqlx::query_as::<_, AgendaEvent>(
            r#"
            SELECT * FROM agenda_events
            WHERE ($1::timestamptz IS NULL OR ends_at >= $1)
              AND ($2::timestamptz IS NULL OR starts_at <= $2)
              AND ($3::uuid IS NULL OR resident_id = $3)
            ORDER BY starts_at ASC
            "#,
        )
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.resident_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<AgendaEvent, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AgendaEvent>("DELETE FROM agenda_events WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Evento".into()))
    }
}
