// src/db/reminder_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::reminders::{Reminder, ReminderFilter, ReminderPayload, ReminderPriority, Recurrence},
};

#[derive(Clone)]
pub struct ReminderRepository {
    pool: PgPool,
}

impl ReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &ReminderPayload,
        created_by: Uuid,
    ) -> Result<Reminder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.insert(
            executor,
            payload.title.trim(),
            payload.description.as_deref(),
            payload.remind_on,
            payload.priority,
            payload.recurrence,
            None,
            Some(created_by),
        )
        .await
    }

    // Inserção crua, usada também para a próxima ocorrência
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        title: &str,
        description: Option<&str>,
        remind_on: Option<NaiveDate>,
        priority: ReminderPriority,
        recurrence: Recurrence,
        anchor_day: Option<i16>,
        created_by: Option<Uuid>,
    ) -> Result<Reminder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reminder = sqlx::query_as::<_, Reminder>(
            r#"
            INSERT INTO reminders (title, description, remind_on, priority, recurrence, anchor_day, created_by)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, EXTRACT(DAY FROM $3::date)::smallint), $7)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(remind_on)
        .bind(priority)
        .bind(recurrence)
        .bind(anchor_day)
        .bind(created_by)
        .fetch_one(executor)
        .await?;

        Ok(reminder)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &ReminderPayload,
    ) -> Result<Reminder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Reminder>(
            r#"
            UPDATE reminders SET
                title = $2, description = $3, remind_on = $4, priority = $5,
                recurrence = $6, anchor_day = EXTRACT(DAY FROM $4::date)::smallint,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.title.trim())
        .bind(&payload.description)
        .bind(payload.remind_on)
        .bind(payload.priority)
        .bind(payload.recurrence)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Lembrete".into()))
    }

    pub async fn list(&self, filter: &ReminderFilter) -> Result<Vec<Reminder>, AppError> {
        let reminders = sqlx::query_as::<_, Reminder>(
            r#"
            SELECT * FROM reminders
            WHERE ($1::boolean IS NULL OR is_done = NOT $1)
              AND ($2::date IS NULL OR remind_on <= $2)
            ORDER BY is_done ASC, remind_on ASC, priority DESC
            "#,
        )
        .bind(filter.pending)
        .bind(filter.until)
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders)
    }

    // Trava a linha até o fim da transação
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Reminder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Lembrete".into()))
    }

    pub async fn mark_done<'e, E>(&self, executor: E, id: Uuid) -> Result<Reminder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Reminder>(
            "UPDATE reminders SET is_done = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Lembrete".into()))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Reminder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Reminder>("DELETE FROM reminders WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Lembrete".into()))
    }
}
