// src/models/residents.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::{dates::HasBirthDate, format};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: Uuid,

    #[schema(example = "Maria das Dores")]
    pub full_name: String,

    #[schema(example = "529.982.247-25")]
    pub cpf: String,

    pub rg: Option<String>,

    #[schema(value_type = String, format = Date, example = "1938-09-02")]
    pub birth_date: NaiveDate,

    pub phone: Option<String>,
    pub address: Option<String>,

    // Contato de emergência (familiar/responsável)
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,

    pub medical_notes: Option<String>,

    // Benefício (aposentadoria, BPC...) e percentual destinado à mensalidade
    #[schema(example = "Aposentadoria INSS")]
    pub benefit_type: Option<String>,
    #[schema(example = "1412.00")]
    pub benefit_amount: Option<Decimal>,
    #[schema(example = "70.00")]
    pub contribution_percentage: Option<Decimal>,

    #[schema(value_type = String, format = Date, example = "2022-05-10")]
    pub admission_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub discharge_date: Option<NaiveDate>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HasBirthDate for Resident {
    fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }
}

fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || *value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("O percentual deve estar entre 0 e 100.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_not_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResidentPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Maria das Dores")]
    pub full_name: String,

    #[serde(default)]
    #[validate(custom(function = "format::validate_cpf"))]
    #[schema(example = "529.982.247-25")]
    pub cpf: String,

    pub rg: Option<String>,

    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "A data de nascimento é obrigatória."))]
    #[schema(value_type = String, format = Date, example = "02/09/1938")]
    pub birth_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(custom(function = "format::validate_phone"))]
    pub phone: Option<String>,

    pub address: Option<String>,

    pub emergency_contact: Option<String>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(custom(function = "format::validate_phone"))]
    pub emergency_phone: Option<String>,

    pub medical_notes: Option<String>,

    pub benefit_type: Option<String>,

    #[serde(default, deserialize_with = "format::brl_opt::deserialize")]
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = Option<String>, example = "1.412,00")]
    pub benefit_amount: Option<Decimal>,

    #[serde(default, deserialize_with = "format::brl_opt::deserialize")]
    #[validate(custom(function = "validate_percentage"))]
    #[schema(value_type = Option<String>, example = "70")]
    pub contribution_percentage: Option<Decimal>,

    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "A data de entrada é obrigatória."))]
    #[schema(value_type = String, format = Date, example = "10/05/2022")]
    pub admission_date: Option<NaiveDate>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ResidentFilter {
    /// Nome ou CPF (parcial)
    pub search: Option<String>,
    /// Por padrão, apenas os ativos
    pub active: Option<bool>,
}
