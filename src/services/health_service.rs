// src/services/health_service.rs

use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AuditRepository, HealthRepository},
    models::{
        activity::AuditAction,
        health::{
            BmiClass, MedicalDocument, MedicalRecord, MedicalRecordPayload, NutritionAssessment,
            NutritionAssessmentView, NutritionPayload, PhysioPayload, PhysioSession, SignedLink,
        },
    },
    services::storage_service::{is_pdf, sanitize_file_name, StorageService},
};

/// IMC = peso / altura², com duas casas.
pub fn compute_bmi(weight_kg: Decimal, height_m: Decimal) -> Option<Decimal> {
    if weight_kg <= Decimal::ZERO || height_m <= Decimal::ZERO {
        return None;
    }
    let bmi = weight_kg.checked_div(height_m * height_m)?;
    Some(bmi.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Classificação de Lipschitz para idosos.
pub fn classify_bmi(bmi: Decimal) -> BmiClass {
    if bmi < Decimal::from(22) {
        BmiClass::Underweight
    } else if bmi > Decimal::from(27) {
        BmiClass::Overweight
    } else {
        BmiClass::Adequate
    }
}

fn to_view(assessment: NutritionAssessment) -> NutritionAssessmentView {
    let bmi_class = classify_bmi(assessment.bmi);
    NutritionAssessmentView { assessment, bmi_class }
}

fn bmi_of(payload: &NutritionPayload) -> Result<Decimal, AppError> {
    match (payload.weight_kg, payload.height_m) {
        (Some(w), Some(h)) => compute_bmi(w, h)
            .ok_or_else(|| AppError::InvalidInput("Peso e altura devem ser positivos.".into())),
        _ => Err(AppError::InvalidInput("Peso e altura são obrigatórios.".into())),
    }
}

#[derive(Clone)]
pub struct HealthService {
    repo: HealthRepository,
    audit: AuditRepository,
    storage: StorageService,
    pool: PgPool,
}

impl HealthService {
    pub fn new(repo: HealthRepository, audit: AuditRepository, storage: StorageService, pool: PgPool) -> Self {
        Self { repo, audit, storage, pool }
    }

    // =========================================================================
    //  PRONTUÁRIO
    // =========================================================================

    pub async fn create_record(
        &self,
        user_id: Uuid,
        resident_id: Uuid,
        payload: &MedicalRecordPayload,
    ) -> Result<MedicalRecord, AppError> {
        let mut tx = self.pool.begin().await?;
        let record = self.repo.create_record(&mut *tx, resident_id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "medical_records", AuditAction::Create, Some(record.id),
                &format!("Registro no prontuário ({:?})", record.kind))
            .await?;
        tx.commit().await?;
        Ok(record)
    }

    pub async fn update_record(
        &self,
        user_id: Uuid,
        resident_id: Uuid,
        id: Uuid,
        payload: &MedicalRecordPayload,
    ) -> Result<MedicalRecord, AppError> {
        let mut tx = self.pool.begin().await?;
        let record = self.repo.update_record(&mut *tx, resident_id, id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "medical_records", AuditAction::Update, Some(id),
                "Registro do prontuário atualizado")
            .await?;
        tx.commit().await?;
        Ok(record)
    }

    pub async fn list_records(&self, resident_id: Uuid) -> Result<Vec<MedicalRecord>, AppError> {
        self.repo.list_records(resident_id).await
    }

    pub async fn delete_record(&self, user_id: Uuid, resident_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.repo.delete_record(&mut *tx, resident_id, id).await?;
        self.audit
            .record(&mut *tx, user_id, "medical_records", AuditAction::Delete, Some(id),
                "Registro do prontuário excluído")
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  DOCUMENTOS (PDF)
    // =========================================================================

    pub async fn upload_document(
        &self,
        user_id: Uuid,
        resident_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<MedicalDocument, AppError> {
        if !is_pdf(bytes) {
            return Err(AppError::InvalidInput("Envie um arquivo PDF.".into()));
        }

        let file_name = sanitize_file_name(file_name);
        let key = format!("residents/{}/{}.pdf", resident_id, Uuid::new_v4());

        self.storage.storage().put(&key, bytes).await?;

        let saved = async {
            let mut tx = self.pool.begin().await?;
            let document = self
                .repo
                .create_document(&mut *tx, resident_id, &file_name, &key, bytes.len() as i64, user_id)
                .await?;
            self.audit
                .record(&mut *tx, user_id, "medical_documents", AuditAction::Create, Some(document.id),
                    &format!("Documento anexado: {}", document.file_name))
                .await?;
            tx.commit().await?;
            Ok::<_, AppError>(document)
        }
        .await;

        // Sem linha no banco, o arquivo não fica órfão
        if saved.is_err() {
            if let Err(e) = self.storage.storage().delete(&key).await {
                tracing::warn!("Falha ao remover arquivo órfão {}: {:?}", key, e);
            }
        }
        saved
    }

    pub async fn list_documents(&self, resident_id: Uuid) -> Result<Vec<MedicalDocument>, AppError> {
        self.repo.list_documents(resident_id).await
    }

    pub async fn document_link(&self, resident_id: Uuid, id: Uuid) -> Result<SignedLink, AppError> {
        let document = self.repo.find_document(resident_id, id).await?;
        self.storage.sign(&document.storage_key, &document.file_name)
    }

    /// Remove a linha e depois o arquivo.
    pub async fn delete_document(&self, user_id: Uuid, resident_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let document = self.repo.delete_document(&mut *tx, resident_id, id).await?;
        self.audit
            .record(&mut *tx, user_id, "medical_documents", AuditAction::Delete, Some(id),
                &format!("Documento removido: {}", document.file_name))
            .await?;
        tx.commit().await?;

        if let Err(e) = self.storage.storage().delete(&document.storage_key).await {
            tracing::warn!("Falha ao remover arquivo {}: {:?}", document.storage_key, e);
        }
        Ok(())
    }

    // =========================================================================
    //  NUTRIÇÃO
    // =========================================================================

    pub async fn create_assessment(
        &self,
        user_id: Uuid,
        resident_id: Uuid,
        payload: &NutritionPayload,
    ) -> Result<NutritionAssessmentView, AppError> {
        let bmi = bmi_of(payload)?;

        let mut tx = self.pool.begin().await?;
        let assessment = self.repo.create_assessment(&mut *tx, resident_id, payload, bmi).await?;
        self.audit
            .record(&mut *tx, user_id, "nutrition_assessments", AuditAction::Create, Some(assessment.id),
                &format!("Avaliação nutricional (IMC {})", assessment.bmi))
            .await?;
        tx.commit().await?;
        Ok(to_view(assessment))
    }

    pub async fn update_assessment(
        &self,
        user_id: Uuid,
        resident_id: Uuid,
        id: Uuid,
        payload: &NutritionPayload,
    ) -> Result<NutritionAssessmentView, AppError> {
        let bmi = bmi_of(payload)?;

        let mut tx = self.pool.begin().await?;
        let assessment = self.repo.update_assessment(&mut *tx, resident_id, id, payload, bmi).await?;
        self.audit
            .record(&mut *tx, user_id, "nutrition_assessments", AuditAction::Update, Some(id),
                &format!("Avaliação nutricional atualizada (IMC {})", assessment.bmi))
            .await?;
        tx.commit().await?;
        Ok(to_view(assessment))
    }

    pub async fn list_assessments(&self, resident_id: Uuid) -> Result<Vec<NutritionAssessmentView>, AppError> {
        let assessments = self.repo.list_assessments(resident_id).await?;
        Ok(assessments.into_iter().map(to_view).collect())
    }

    pub async fn delete_assessment(&self, user_id: Uuid, resident_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.repo.delete_assessment(&mut *tx, resident_id, id).await?;
        self.audit
            .record(&mut *tx, user_id, "nutrition_assessments", AuditAction::Delete, Some(id),
                "Avaliação nutricional excluída")
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  FISIOTERAPIA
    // =========================================================================

    pub async fn create_session(
        &self,
        user_id: Uuid,
        resident_id: Uuid,
        payload: &PhysioPayload,
    ) -> Result<PhysioSession, AppError> {
        let mut tx = self.pool.begin().await?;
        let session = self.repo.create_session(&mut *tx, resident_id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "physio_sessions", AuditAction::Create, Some(session.id),
                &format!("Sessão de fisioterapia: {}", session.session_kind))
            .await?;
        tx.commit().await?;
        Ok(session)
    }

    pub async fn update_session(
        &self,
        user_id: Uuid,
        resident_id: Uuid,
        id: Uuid,
        payload: &PhysioPayload,
    ) -> Result<PhysioSession, AppError> {
        let mut tx = self.pool.begin().await?;
        let session = self.repo.update_session(&mut *tx, resident_id, id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "physio_sessions", AuditAction::Update, Some(id),
                &format!("Sessão de fisioterapia atualizada: {}", session.session_kind))
            .await?;
        tx.commit().await?;
        Ok(session)
    }

    pub async fn list_sessions(&self, resident_id: Uuid) -> Result<Vec<PhysioSession>, AppError> {
        self.repo.list_sessions(resident_id).await
    }

    pub async fn delete_session(&self, user_id: Uuid, resident_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.repo.delete_session(&mut *tx, resident_id, id).await?;
        self.audit
            .record(&mut *tx, user_id, "physio_sessions", AuditAction::Delete, Some(id),
                "Sessão de fisioterapia excluída")
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn computes_bmi() {
        // 61,5 / 1,58² = 24,635...
        assert_eq!(compute_bmi(dec("61.5"), dec("1.58")), Some(dec("24.64")));
        assert_eq!(compute_bmi(dec("70"), dec("1.75")), Some(dec("22.86")));
        assert_eq!(compute_bmi(dec("70"), Decimal::ZERO), None);
        assert_eq!(compute_bmi(Decimal::ZERO, dec("1.60")), None);
    }

    #[test]
    fn lipschitz_thresholds() {
        assert_eq!(classify_bmi(dec("21.99")), BmiClass::Underweight);
        assert_eq!(classify_bmi(dec("22")), BmiClass::Adequate);
        assert_eq!(classify_bmi(dec("27")), BmiClass::Adequate);
        assert_eq!(classify_bmi(dec("27.01")), BmiClass::Overweight);
    }
}
