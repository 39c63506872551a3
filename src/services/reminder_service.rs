// src/services/reminder_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{dates, error::AppError},
    db::{AuditRepository, ReminderRepository},
    models::{
        activity::AuditAction,
        reminders::{CompletedReminder, Reminder, ReminderFilter, ReminderPayload},
    },
};

#[derive(Clone)]
pub struct ReminderService {
    repo: ReminderRepository,
    audit: AuditRepository,
    pool: PgPool,
}

impl ReminderService {
    pub fn new(repo: ReminderRepository, audit: AuditRepository, pool: PgPool) -> Self {
        Self { repo, audit, pool }
    }

    pub async fn create(&self, user_id: Uuid, payload: &ReminderPayload) -> Result<Reminder, AppError> {
        let mut tx = self.pool.begin().await?;
        let reminder = self.repo.create(&mut *tx, payload, user_id).await?;
        self.audit
            .record(&mut *tx, user_id, "reminders", AuditAction::Create, Some(reminder.id),
                &format!("Lembrete criado: {}", reminder.title))
            .await?;
        tx.commit().await?;
        Ok(reminder)
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, payload: &ReminderPayload) -> Result<Reminder, AppError> {
        let mut tx = self.pool.begin().await?;
        let reminder = self.repo.update(&mut *tx, id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "reminders", AuditAction::Update, Some(id),
                &format!("Lembrete atualizado: {}", reminder.title))
            .await?;
        tx.commit().await?;
        Ok(reminder)
    }

    pub async fn list(&self, filter: &ReminderFilter) -> Result<Vec<Reminder>, AppError> {
        self.repo.list(filter).await
    }

    /// Conclui o lembrete e, se for recorrente, agenda a próxima ocorrência.
    pub async fn complete(&self, user_id: Uuid, id: Uuid) -> Result<CompletedReminder, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self.repo.find_for_update(&mut *tx, id).await?;
        if current.is_done {
            return Err(AppError::InvalidInput("Este lembrete já foi concluído.".into()));
        }

        let completed = self.repo.mark_done(&mut *tx, id).await?;

        let anchor_day = completed.anchor_day.max(1) as u32;
        let next = match dates::next_occurrence(completed.remind_on, completed.recurrence, anchor_day) {
            Some(next_date) => Some(
                self.repo
                    .insert(
                        &mut *tx,
                        &completed.title,
                        completed.description.as_deref(),
                        Some(next_date),
                        completed.priority,
                        completed.recurrence,
                        Some(completed.anchor_day),
                        completed.created_by,
                    )
                    .await?,
            ),
            None => None,
        };

        self.audit
            .record(&mut *tx, user_id, "reminders", AuditAction::Update, Some(id),
                &format!("Lembrete concluído: {}", completed.title))
            .await?;
        tx.commit().await?;

        Ok(CompletedReminder { completed, next })
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let reminder = self.repo.delete(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, user_id, "reminders", AuditAction::Delete, Some(id),
                &format!("Lembrete excluído: {}", reminder.title))
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{common::test_support::seed_user, models::reminders::Recurrence};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn payload(remind_on: &str, recurrence: &str) -> ReminderPayload {
        serde_json::from_value(serde_json::json!({
            "title": "Pagar conta de luz",
            "remindOn": remind_on,
            "recurrence": recurrence
        }))
        .unwrap()
    }

    fn service(pool: PgPool) -> ReminderService {
        ReminderService::new(ReminderRepository::new(pool.clone()), AuditRepository::new(pool.clone()), pool)
    }

    // Precisa de um Postgres em DATABASE_URL: cargo test -- --ignored
    #[sqlx::test]
    #[ignore]
    async fn completing_schedules_the_next_occurrence_on_the_same_day(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        let first = service.create(user, &payload("31/01/2025", "MONTHLY")).await.unwrap();

        let done = service.complete(user, first.id).await.unwrap();
        assert!(done.completed.is_done);
        let february = done.next.unwrap();
        assert_eq!(february.remind_on, d(2025, 2, 28));
        assert!(!february.is_done);
        assert_eq!(february.recurrence, Recurrence::Monthly);

        let done = service.complete(user, february.id).await.unwrap();
        assert_eq!(done.next.unwrap().remind_on, d(2025, 3, 31));

        let pending = service
            .list(&ReminderFilter { pending: Some(true), until: None })
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[sqlx::test]
    #[ignore]
    async fn editing_the_date_moves_the_series_day(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        let created = service.create(user, &payload("31/01/2025", "MONTHLY")).await.unwrap();

        let moved = service.update(user, created.id, &payload("15/01/2025", "MONTHLY")).await.unwrap();
        let done = service.complete(user, moved.id).await.unwrap();
        assert_eq!(done.next.unwrap().remind_on, d(2025, 2, 15));
    }

    #[sqlx::test]
    #[ignore]
    async fn single_reminders_complete_once(pool: PgPool) {
        let user = seed_user(&pool).await;
        let service = service(pool.clone());
        let created = service.create(user, &payload("10/03/2025", "NONE")).await.unwrap();

        let done = service.complete(user, created.id).await.unwrap();
        assert!(done.next.is_none());

        let err = service.complete(user, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
