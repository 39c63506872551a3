// src/services/agenda_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AgendaRepository, AuditRepository},
    models::{
        activity::AuditAction,
        agenda::{AgendaEvent, AgendaEventPayload, AgendaFilter},
    },
};

#[derive(Clone)]
pub struct AgendaService {
    repo: AgendaRepository,
    audit: AuditRepository,
    pool: PgPool,
}

impl AgendaService {
    pub fn new(repo: AgendaRepository, audit: AuditRepository, pool: PgPool) -> Self {
        Self { repo, audit, pool }
    }

    pub async fn create(&self, user_id: Uuid, payload: &AgendaEventPayload) -> Result<AgendaEvent, AppError> {
        let mut tx = self.pool.begin().await?;
        let event = self.repo.create(&mut *tx, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "agenda_events", AuditAction::Create, Some(event.id),
                &format!("Evento agendado: {} em {}", event.title, event.starts_at.format("%d/%m/%Y %H:%M")))
            .await?;
        tx.commit().await?;
        Ok(event)
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, payload: &AgendaEventPayload) -> Result<AgendaEvent, AppError> {
        let mut tx = self.pool.begin().await?;
        let event = self.repo.update(&mut *tx, id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "agenda_events", AuditAction::Update, Some(id),
                &format!("Evento atualizado: {}", event.title))
            .await?;
        tx.commit().await?;
        Ok(event)
    }

    pub async fn list(&self, filter: &AgendaFilter) -> Result<Vec<AgendaEvent>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let event = self.repo.delete(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, user_id, "agenda_events", AuditAction::Delete, Some(id),
                &format!("Evento excluído: {}", event.title))
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
