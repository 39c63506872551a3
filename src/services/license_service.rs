// src/services/license_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AuditRepository, LicenseRepository},
    models::{
        activity::AuditAction,
        health::SignedLink,
        licenses::{License, LicensePayload, LicenseStatus, LicenseView},
    },
    services::storage_service::{is_pdf, sanitize_file_name, StorageService},
};

/// Licenças que vencem dentro deste prazo aparecem como EXPIRING.
pub const EXPIRING_WINDOW_DAYS: i64 = 30;

pub fn license_status(expires_on: NaiveDate, today: NaiveDate) -> (LicenseStatus, i64) {
    let days = (expires_on - today).num_days();
    let status = if days < 0 {
        LicenseStatus::Expired
    } else if days <= EXPIRING_WINDOW_DAYS {
        LicenseStatus::Expiring
    } else {
        LicenseStatus::Valid
    };
    (status, days)
}

fn to_view(license: License, today: NaiveDate) -> LicenseView {
    let (status, days_to_expiry) = license_status(license.expires_on, today);
    let has_document = license.document_key.is_some();
    LicenseView { license, status, days_to_expiry, has_document }
}

#[derive(Clone)]
pub struct LicenseService {
    repo: LicenseRepository,
    audit: AuditRepository,
    storage: StorageService,
    pool: PgPool,
}

impl LicenseService {
    pub fn new(repo: LicenseRepository, audit: AuditRepository, storage: StorageService, pool: PgPool) -> Self {
        Self { repo, audit, storage, pool }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    pub async fn create(&self, user_id: Uuid, payload: &LicensePayload) -> Result<LicenseView, AppError> {
        let mut tx = self.pool.begin().await?;
        let license = self.repo.create(&mut *tx, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "licenses", AuditAction::Create, Some(license.id),
                &format!("Licença cadastrada: {}", license.name))
            .await?;
        tx.commit().await?;
        Ok(to_view(license, Self::today()))
    }

    pub async fn update(&self, user_id: Uuid, id: Uuid, payload: &LicensePayload) -> Result<LicenseView, AppError> {
        let mut tx = self.pool.begin().await?;
        let license = self.repo.update(&mut *tx, id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "licenses", AuditAction::Update, Some(id),
                &format!("Licença atualizada: {}", license.name))
            .await?;
        tx.commit().await?;
        Ok(to_view(license, Self::today()))
    }

    pub async fn list(&self) -> Result<Vec<LicenseView>, AppError> {
        let today = Self::today();
        let licenses = self.repo.list().await?;
        Ok(licenses.into_iter().map(|l| to_view(l, today)).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<LicenseView, AppError> {
        let license = self.repo.find(&self.pool, id).await?;
        Ok(to_view(license, Self::today()))
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let license = self.repo.delete(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, user_id, "licenses", AuditAction::Delete, Some(id),
                &format!("Licença excluída: {}", license.name))
            .await?;
        tx.commit().await?;

        if let Some(key) = license.document_key {
            if let Err(e) = self.storage.storage().delete(&key).await {
                tracing::warn!("Falha ao remover arquivo {}: {:?}", key, e);
            }
        }
        Ok(())
    }

    /// Anexa (ou substitui) o PDF da licença.
    pub async fn upload_document(&self, user_id: Uuid, id: Uuid, bytes: &[u8]) -> Result<LicenseView, AppError> {
        if !is_pdf(bytes) {
            return Err(AppError::InvalidInput("Envie um arquivo PDF.".into()));
        }

        // Confere a existência antes de gravar o arquivo
        self.repo.find(&self.pool, id).await?;

        let key = format!("licenses/{}/{}.pdf", id, Uuid::new_v4());
        self.storage.storage().put(&key, bytes).await?;

        let saved = async {
            let mut tx = self.pool.begin().await?;
            let previous = self.repo.find(&mut *tx, id).await?.document_key;
            let license = self.repo.set_document(&mut *tx, id, Some(&key)).await?;
            self.audit
                .record(&mut *tx, user_id, "licenses", AuditAction::Update, Some(id),
                    &format!("Documento anexado à licença: {}", license.name))
                .await?;
            tx.commit().await?;
            Ok::<_, AppError>((license, previous))
        }
        .await;

        match saved {
            Ok((license, previous)) => {
                if let Some(old_key) = previous {
                    if let Err(e) = self.storage.storage().delete(&old_key).await {
                        tracing::warn!("Falha ao remover arquivo antigo {}: {:?}", old_key, e);
                    }
                }
                Ok(to_view(license, Self::today()))
            }
            Err(e) => {
                if let Err(del) = self.storage.storage().delete(&key).await {
                    tracing::warn!("Falha ao remover arquivo órfão {}: {:?}", key, del);
                }
                Err(e)
            }
        }
    }

    pub async fn document_link(&self, id: Uuid) -> Result<SignedLink, AppError> {
        let license = self.repo.find(&self.pool, id).await?;
        let key = license
            .document_key
            .ok_or_else(|| AppError::NotFound("Documento da licença".into()))?;
        self.storage.sign(&key, &sanitize_file_name(&format!("{}.pdf", license.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn status_by_days_to_expiry() {
        let today = d(2025, 3, 1);
        assert_eq!(license_status(d(2025, 2, 28), today), (LicenseStatus::Expired, -1));
        assert_eq!(license_status(d(2025, 3, 1), today), (LicenseStatus::Expiring, 0));
        assert_eq!(license_status(d(2025, 3, 31), today), (LicenseStatus::Expiring, 30));
        assert_eq!(license_status(d(2025, 4, 1), today), (LicenseStatus::Valid, 31));
    }
}
