// src/models/suppliers.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::format;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,

    #[schema(example = "Distribuidora Saúde Total Ltda")]
    pub name: String,

    #[schema(example = "11.222.333/0001-81")]
    pub document_number: Option<String>,

    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub contact_name: Option<String>,

    #[schema(example = "Medicamentos")]
    pub category: Option<String>,

    pub notes: Option<String>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome do fornecedor é obrigatório."))]
    pub name: String,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(custom(function = "format::validate_document"))]
    #[schema(example = "11222333000181")]
    pub document_number: Option<String>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(custom(function = "format::validate_phone"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub address: Option<String>,
    pub contact_name: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SupplierFilter {
    /// Nome, documento ou categoria (parcial)
    pub search: Option<String>,
    pub active: Option<bool>,
}
