// src/db/supplier_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::{digits_pattern, like_pattern, map_constraint_error}, error::AppError},
    models::suppliers::{Supplier, SupplierFilter, SupplierPayload},
};

const DOCUMENT_TAKEN: &str = "Já existe um fornecedor com este CPF/CNPJ.";
const SUPPLIER_IN_USE: &str = "Fornecedor possui contas a pagar vinculadas.";

#[derive(Clone)]
pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &SupplierPayload) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (
                name, document_number, phone, email, address, contact_name,
                category, notes, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, TRUE))
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(&payload.document_number)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(&payload.contact_name)
        .bind(&payload.category)
        .bind(&payload.notes)
        .bind(payload.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, DOCUMENT_TAKEN, SUPPLIER_IN_USE))?;

        Ok(supplier)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &SupplierPayload,
    ) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers SET
                name = $2, document_number = $3, phone = $4, email = $5, address = $6,
                contact_name = $7, category = $8, notes = $9,
                is_active = COALESCE($10, is_active), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.trim())
        .bind(&payload.document_number)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(&payload.contact_name)
        .bind(&payload.category)
        .bind(&payload.notes)
        .bind(payload.is_active)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, DOCUMENT_TAKEN, SUPPLIER_IN_USE))?
        .ok_or_else(|| AppError::NotFound("Fornecedor".into()))
    }

    pub async fn list(&self, filter: &SupplierFilter) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT * FROM suppliers
            WHERE ($1::text IS NULL OR name ILIKE $1 OR document_number ILIKE $1 OR category ILIKE $1
                   OR regexp_replace(document_number, '[^0-9]', '', 'g') LIKE $3)
              AND ($2::boolean IS NULL OR is_active = $2)
            ORDER BY name ASC
            "#,
        )
        .bind(like_pattern(filter.search.as_deref()))
        .bind(filter.active)
        .bind(digits_pattern(filter.search.as_deref()))
        .fetch_all(&self.pool)
        .await?;
        Ok(suppliers)
    }

    pub async fn find(&self, id: Uuid) -> Result<Supplier, AppError> {
        sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Fornecedor".into()))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Supplier>("DELETE FROM suppliers WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_constraint_error(e, SUPPLIER_IN_USE, SUPPLIER_IN_USE))?
            .ok_or_else(|| AppError::NotFound("Fornecedor".into()))
    }
}
