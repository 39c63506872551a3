// src/db/donation_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::donations::{Donation, DonationFilter, DonationPayload},
};

#[derive(Clone)]
pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &DonationPayload) -> Result<Donation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let donation = sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO donations (
                donor_name, donor_document, kind, amount, item_description,
                quantity, donation_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(payload.donor_name.trim())
        .bind(&payload.donor_document)
        .bind(payload.kind)
        .bind(payload.amount)
        .bind(&payload.item_description)
        .bind(payload.quantity)
        .bind(payload.donation_date)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await?;

        Ok(donation)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &DonationPayload,
    ) -> Result<Donation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Donation>(
            r#"
            UPDATE donations SET
                donor_name = $2, donor_document = $3, kind = $4, amount = $5,
                item_description = $6, quantity = $7, donation_date = $8, notes = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.donor_name.trim())
        .bind(&payload.donor_document)
        .bind(payload.kind)
        .bind(payload.amount)
        .bind(&payload.item_description)
        .bind(payload.quantity)
        .bind(payload.donation_date)
        .bind(&payload.notes)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Doação".into()))
    }

    pub async fn list(&self, filter: &DonationFilter) -> Result<Vec<Donation>, AppError> {
        let donations = sqlx::query_as::<_, Donation>(
            r#"
            SELECT * FROM donations
            WHERE ($1::donation_kind IS NULL OR kind = $1)
              AND ($2::date IS NULL OR donation_date >= $2)
              AND ($3::date IS NULL OR donation_date <= $3)
            ORDER BY donation_date DESC, created_at DESC
            "#,
        )
        .bind(filter.kind)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;
        Ok(donations)
    }

    pub async fn find(&self, id: Uuid) -> Result<Donation, AppError> {
        sqlx::query_as::<_, Donation>("SELECT * FROM donations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Doação".into()))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Donation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Donation>("DELETE FROM donations WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Doação".into()))
    }
}
