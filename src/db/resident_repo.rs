// src/db/resident_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::{digits_pattern, like_pattern, map_constraint_error}, error::AppError},
    models::residents::{Resident, ResidentFilter, ResidentPayload},
};

const CPF_TAKEN: &str = "Já existe um idoso cadastrado com este CPF.";

#[derive(Clone)]
pub struct ResidentRepository {
    pool: PgPool,
}

impl ResidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &ResidentPayload) -> Result<Resident, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resident = sqlx::query_as::<_, Resident>(
            r#"
            INSERT INTO residents (
                full_name, cpf, rg, birth_date, phone, address,
                emergency_contact, emergency_phone, medical_notes,
                benefit_type, benefit_amount, contribution_percentage,
                admission_date, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, COALESCE($14, TRUE))
            RETURNING *
            "#,
        )
        .bind(payload.full_name.trim())
        .bind(&payload.cpf)
        .bind(&payload.rg)
        .bind(payload.birth_date)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(&payload.emergency_contact)
        .bind(&payload.emergency_phone)
        .bind(&payload.medical_notes)
        .bind(&payload.benefit_type)
        .bind(payload.benefit_amount)
        .bind(payload.contribution_percentage)
        .bind(payload.admission_date)
        .bind(payload.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, CPF_TAKEN, "Referência inválida."))?;

        Ok(resident)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &ResidentPayload,
    ) -> Result<Resident, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Resident>(
            r#"
            UPDATE residents SET
                full_name = $2, cpf = $3, rg = $4, birth_date = $5, phone = $6,
                address = $7, emergency_contact = $8, emergency_phone = $9,
                medical_notes = $10, benefit_type = $11, benefit_amount = $12,
                contribution_percentage = $13, admission_date = $14,
                is_active = COALESCE($15, is_active),
                discharge_date = CASE WHEN COALESCE($15, is_active) THEN NULL ELSE discharge_date END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.full_name.trim())
        .bind(&payload.cpf)
        .bind(&payload.rg)
        .bind(payload.birth_date)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(&payload.emergency_contact)
        .bind(&payload.emergency_phone)
        .bind(&payload.medical_notes)
        .bind(&payload.benefit_type)
        .bind(payload.benefit_amount)
        .bind(payload.contribution_percentage)
        .bind(payload.admission_date)
        .bind(payload.is_active)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, CPF_TAKEN, "Referência inválida."))?
        .ok_or_else(|| AppError::NotFound("Idoso".into()))
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<Resident, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Resident>("SELECT * FROM residents WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Idoso".into()))
    }

    pub async fn list(&self, filter: &ResidentFilter) -> Result<Vec<Resident>, AppError> {
        let residents = sqlx::query_as::<_, Resident>(
            r#"
            SELECT * FROM residents
            WHERE ($1::text IS NULL OR full_name ILIKE $1 OR cpf ILIKE $1
                   OR regexp_replace(cpf, '[^0-9]', '', 'g') LIKE $3)
              AND is_active = $2
            ORDER BY full_name ASC
            "#,
        )
        .bind(like_pattern(filter.search.as_deref()))
        .bind(filter.active.unwrap_or(true))
        .bind(digits_pattern(filter.search.as_deref()))
        .fetch_all(&self.pool)
        .await?;
        Ok(residents)
    }

    pub async fn list_active<'e, E>(&self, executor: E) -> Result<Vec<Resident>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let residents = sqlx::query_as::<_, Resident>(
            "SELECT * FROM residents WHERE is_active ORDER BY full_name ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(residents)
    }

    /// Saída do idoso (exclusão lógica).
    pub async fn discharge<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        discharge_date: NaiveDate,
    ) -> Result<Resident, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Resident>(
            r#"
            UPDATE residents
            SET is_active = FALSE, discharge_date = COALESCE(discharge_date, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(discharge_date)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Idoso".into()))
    }
}
