// src/models/settings.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::format;

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionSettings {
    #[schema(example = "Crevin - Casa de Repouso")]
    pub name: Option<String>,

    #[schema(example = "11.222.333/0001-81")]
    pub document_number: Option<String>,

    #[schema(example = "Rua das Flores, 123 - Centro")]
    pub address: Option<String>,

    #[schema(example = "(11) 3456-7890")]
    pub phone: Option<String>,

    #[schema(example = "contato@crevin.org.br")]
    pub email: Option<String>,

    #[schema(example = "11.222.333/0001-81")]
    pub pix_key: Option<String>,

    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub name: Option<String>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(custom(function = "format::validate_document"))]
    pub document_number: Option<String>,

    pub address: Option<String>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(custom(function = "format::validate_phone"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    pub pix_key: Option<String>,
}
