// src/db/health_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::health::{
        MedicalDocument, MedicalRecord, MedicalRecordPayload, NutritionAssessment, NutritionPayload,
        PhysioPayload, PhysioSession,
    },
};

const RESIDENT_MISSING: &str = "Idoso inexistente.";

#[derive(Clone)]
pub struct HealthRepository {
    pool: PgPool,
}

impl HealthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PRONTUÁRIO
    // =========================================================================

    pub async fn create_record<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        payload: &MedicalRecordPayload,
    ) -> Result<MedicalRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, MedicalRecord>(
            r#"
            INSERT INTO medical_records (resident_id, record_date, kind, professional, description, medications, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(resident_id)
        .bind(payload.record_date)
        .bind(payload.kind)
        .bind(&payload.professional)
        .bind(payload.description.trim())
        .bind(&payload.medications)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Registro duplicado.", RESIDENT_MISSING))?;

        Ok(record)
    }

    pub async fn update_record<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        id: Uuid,
        payload: &MedicalRecordPayload,
    ) -> Result<MedicalRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, MedicalRecord>(
            r#"
            UPDATE medical_records SET
                record_date = $3, kind = $4, professional = $5, description = $6,
                medications = $7, notes = $8
            WHERE id = $1 AND resident_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(resident_id)
        .bind(payload.record_date)
        .bind(payload.kind)
        .bind(&payload.professional)
        .bind(payload.description.trim())
        .bind(&payload.medications)
        .bind(&payload.notes)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Registro do prontuário".into()))
    }

    pub async fn list_records(&self, resident_id: Uuid) -> Result<Vec<MedicalRecord>, AppError> {
        let records = sqlx::query_as::<_, MedicalRecord>(
            "SELECT * FROM medical_records WHERE resident_id = $1 ORDER BY record_date DESC, created_at DESC",
        )
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    pub async fn delete_record<'e, E>(&self, executor: E, resident_id: Uuid, id: Uuid) -> Result<MedicalRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, MedicalRecord>(
            "DELETE FROM medical_records WHERE id = $1 AND resident_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(resident_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Registro do prontuário".into()))
    }

    // =========================================================================
    //  DOCUMENTOS
    // =========================================================================

    pub async fn create_document<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        file_name: &str,
        storage_key: &str,
        size_bytes: i64,
        uploaded_by: Uuid,
    ) -> Result<MedicalDocument, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let document = sqlx::query_as::<_, MedicalDocument>(
            r#"
            INSERT INTO medical_documents (resident_id, file_name, storage_key, size_bytes, uploaded_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(resident_id)
        .bind(file_name)
        .bind(storage_key)
        .bind(size_bytes)
        .bind(uploaded_by)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Documento duplicado.", RESIDENT_MISSING))?;

        Ok(document)
    }

    pub async fn list_documents(&self, resident_id: Uuid) -> Result<Vec<MedicalDocument>, AppError> {
        let documents = sqlx::query_as::<_, MedicalDocument>(
            "SELECT * FROM medical_documents WHERE resident_id = $1 ORDER BY created_at DESC",
        )
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(documents)
    }

    pub async fn find_document(&self, resident_id: Uuid, id: Uuid) -> Result<MedicalDocument, AppError> {
        sqlx::query_as::<_, MedicalDocument>(
            "SELECT * FROM medical_documents WHERE id = $1 AND resident_id = $2",
        )
        .bind(id)
        .bind(resident_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Documento".into()))
    }

    pub async fn delete_document<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        id: Uuid,
    ) -> Result<MedicalDocument, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, MedicalDocument>(
            "DELETE FROM medical_documents WHERE id = $1 AND resident_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(resident_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Documento".into()))
    }

    // =========================================================================
    //  NUTRIÇÃO
    // =========================================================================

    pub async fn create_assessment<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        payload: &NutritionPayload,
        bmi: Decimal,
    ) -> Result<NutritionAssessment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assessment = sqlx::query_as::<_, NutritionAssessment>(
            r#"
            INSERT INTO nutrition_assessments (
                resident_id, assessed_on, weight_kg, height_m, bmi, diet, restrictions, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(resident_id)
        .bind(payload.assessed_on)
        .bind(payload.weight_kg)
        .bind(payload.height_m)
        .bind(bmi)
        .bind(&payload.diet)
        .bind(&payload.restrictions)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Avaliação duplicada.", RESIDENT_MISSING))?;

        Ok(assessment)
    }

    pub async fn update_assessment<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        id: Uuid,
        payload: &NutritionPayload,
        bmi: Decimal,
    ) -> Result<NutritionAssessment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, NutritionAssessment>(
            r#"
            UPDATE nutrition_assessments SET
                assessed_on = $3, weight_kg = $4, height_m = $5, bmi = $6,
                diet = $7, restrictions = $8, notes = $9
            WHERE id = $1 AND resident_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(resident_id)
        .bind(payload.assessed_on)
        .bind(payload.weight_kg)
        .bind(payload.height_m)
        .bind(bmi)
        .bind(&payload.diet)
        .bind(&payload.restrictions)
        .bind(&payload.notes)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Avaliação nutricional".into()))
    }

    pub async fn list_assessments(&self, resident_id: Uuid) -> Result<Vec<NutritionAssessment>, AppError> {
        let assessments = sqlx::query_as::<_, NutritionAssessment>(
            "SELECT * FROM nutrition_assessments WHERE resident_id = $1 ORDER BY assessed_on DESC, created_at DESC",
        )
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assessments)
    }

    pub async fn delete_assessment<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        id: Uuid,
    ) -> Result<NutritionAssessment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, NutritionAssessment>(
            "DELETE FROM nutrition_assessments WHERE id = $1 AND resident_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(resident_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Avaliação nutricional".into()))
    }

    // =========================================================================
    //  FISIOTERAPIA
    // =========================================================================

    pub async fn create_session<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        payload: &PhysioPayload,
    ) -> Result<PhysioSession, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let session = sqlx::query_as::<_, PhysioSession>(
            r#"
            INSERT INTO physio_sessions (resident_id, session_date, professional, session_kind, evolution, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(resident_id)
        .bind(payload.session_date)
        .bind(&payload.professional)
        .bind(payload.session_kind.trim())
        .bind(&payload.evolution)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Sessão duplicada.", RESIDENT_MISSING))?;

        Ok(session)
    }

    pub async fn update_session<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        id: Uuid,
        payload: &PhysioPayload,
    ) -> Result<PhysioSession, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PhysioSession>(
            r#"
            UPDATE physio_sessions SET
                session_date = $3, professional = $4, session_kind = $5, evolution = $6, notes = $7
            WHERE id = $1 AND resident_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(resident_id)
        .bind(payload.session_date)
        .bind(&payload.professional)
        .bind(payload.session_kind.trim())
        .bind(&payload.evolution)
        .bind(&payload.notes)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Sessão de fisioterapia".into()))
    }

    pub async fn list_sessions(&self, resident_id: Uuid) -> Result<Vec<PhysioSession>, AppError> {
        let sessions = sqlx::query_as::<_, PhysioSession>(
            "SELECT * FROM physio_sessions WHERE resident_id = $1 ORDER BY session_date DESC, created_at DESC",
        )
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    pub async fn delete_session<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        id: Uuid,
    ) -> Result<PhysioSession, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PhysioSession>(
            "DELETE FROM physio_sessions WHERE id = $1 AND resident_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(resident_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Sessão de fisioterapia".into()))
    }
}
