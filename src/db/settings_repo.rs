// src/db/settings_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::settings::{InstitutionSettings, UpdateSettingsRequest},
};

const SETTINGS_COLUMNS: &str = "name, document_number, address, phone, email, pix_key, updated_at";

// Sem estado: as consultas recebem o executor de quem chama
#[derive(Clone, Default)]
pub struct SettingsRepository;

impl SettingsRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_settings<'e, E>(&self, executor: E) -> Result<InstitutionSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM institution_settings WHERE id = 1");
        let settings = sqlx::query_as::<_, InstitutionSettings>(&sql)
            .fetch_optional(executor)
            .await?;

        // Ainda não configurado: tudo vazio
        Ok(settings.unwrap_or_default())
    }

    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        input: &UpdateSettingsRequest,
    ) -> Result<InstitutionSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // UPSERT da linha única
        let sql = format!(
            r#"
            INSERT INTO institution_settings (id, name, document_number, address, phone, email, pix_key)
            VALUES (1, $1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                document_number = EXCLUDED.document_number,
                address = EXCLUDED.address,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                pix_key = EXCLUDED.pix_key,
                updated_at = NOW()
            RETURNING {SETTINGS_COLUMNS}
            "#
        );
        let settings = sqlx::query_as::<_, InstitutionSettings>(&sql)
            .bind(&input.name)
            .bind(&input.document_number)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.pix_key)
            .fetch_one(executor)
            .await?;
        Ok(settings)
    }
}
