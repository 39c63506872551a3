// src/models/licenses.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::format;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub id: Uuid,

    #[schema(example = "Alvará Sanitário")]
    pub name: String,

    #[schema(example = "Vigilância Sanitária Municipal")]
    pub issuing_body: String,

    pub license_number: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub issued_on: Option<NaiveDate>,

    #[schema(value_type = String, format = Date, example = "2025-12-31")]
    pub expires_on: NaiveDate,

    pub notes: Option<String>,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub document_key: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseStatus {
    Valid,    // Vigente
    Expiring, // Vence nos próximos 30 dias
    Expired,  // Vencida
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LicenseView {
    #[serde(flatten)]
    pub license: License,
    pub status: LicenseStatus,
    /// Negativo quando já venceu
    pub days_to_expiry: i64,
    pub has_document: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LicensePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome da licença é obrigatório."))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "O órgão emissor é obrigatório."))]
    pub issuing_body: String,

    pub license_number: Option<String>,

    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[schema(value_type = Option<String>, format = Date, example = "01/01/2025")]
    pub issued_on: Option<NaiveDate>,

    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "A data de validade é obrigatória."))]
    #[schema(value_type = String, format = Date, example = "31/12/2025")]
    pub expires_on: Option<NaiveDate>,

    pub notes: Option<String>,
}
