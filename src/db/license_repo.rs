// src/db/license_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::licenses::{License, LicensePayload},
};

#[derive(Clone)]
pub struct LicenseRepository {
    pool: PgPool,
}

impl LicenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &LicensePayload) -> Result<License, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let license = sqlx::query_as::<_, License>(
            r#"
            INSERT INTO licenses (name, issuing_body, license_number, issued_on, expires_on, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.issuing_body.trim())
        .bind(&payload.license_number)
        .bind(payload.issued_on)
        .bind(payload.expires_on)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await?;

        Ok(license)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: &LicensePayload) -> Result<License, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, License>(
            r#"
            UPDATE licenses SET
                name = $2, issuing_body = $3, license_number = $4,
                issued_on = $5, expires_on = $6, notes = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.trim())
        .bind(payload.issuing_body.trim())
        .bind(&payload.license_number)
        .bind(payload.issued_on)
        .bind(payload.expires_on)
        .bind(&payload.notes)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Licença".into()))
    }

    // Vencimento mais próximo primeiro
    pub async fn list(&self) -> Result<Vec<License>, AppError> {
        let licenses = sqlx::query_as::<_, License>("SELECT * FROM licenses ORDER BY expires_on ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(licenses)
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<License, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, License>("SELECT * FROM licenses WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Licença".into()))
    }

    pub async fn set_document<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        document_key: Option<&str>,
    ) -> Result<License, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, License>(
            "UPDATE licenses SET document_key = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(document_key)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Licença".into()))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<License, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, License>("DELETE FROM licenses WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Licença".into()))
    }
}
