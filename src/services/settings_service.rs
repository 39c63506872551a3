// src/services/settings_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, format},
    db::{AuditRepository, SettingsRepository},
    models::{
        activity::AuditAction,
        settings::{InstitutionSettings, UpdateSettingsRequest},
    },
};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    audit: AuditRepository,
    pool: PgPool,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository, audit: AuditRepository, pool: PgPool) -> Self {
        Self { repo, audit, pool }
    }

    pub async fn get(&self) -> Result<InstitutionSettings, AppError> {
        self.repo.get_settings(&self.pool).await
    }

    pub async fn update(&self, user_id: Uuid, mut input: UpdateSettingsRequest) -> Result<InstitutionSettings, AppError> {
        input.document_number = match input.document_number.as_deref() {
            Some(doc) => Some(format::format_document(doc)?),
            None => None,
        };
        input.phone = format::normalize_phone(input.phone.as_deref());
        input.email = input.email.map(|e| e.trim().to_lowercase());

        let mut tx = self.pool.begin().await?;
        let settings = self.repo.update_settings(&mut *tx, &input).await?;
        self.audit
            .record(&mut *tx, user_id, "institution_settings", AuditAction::Update, None,
                "Configurações da instituição atualizadas")
            .await?;
        tx.commit().await?;
        Ok(settings)
    }
}
