// src/models/donations.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "donation_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationKind {
    Money, // Em dinheiro
    Item,  // Itens (alimentos, fraldas, roupas...)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,

    #[schema(example = "Supermercado Bom Preço")]
    pub donor_name: String,
    pub donor_document: Option<String>,

    pub kind: DonationKind,

    #[schema(example = "500.00")]
    pub amount: Option<Decimal>,

    #[schema(example = "Fraldas geriátricas G")]
    pub item_description: Option<String>,
    #[schema(example = 40)]
    pub quantity: Option<i32>,

    #[schema(value_type = String, format = Date, example = "2025-03-02")]
    pub donation_date: NaiveDate,

    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome do doador é obrigatório."))]
    pub donor_name: String,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(custom(function = "format::validate_document"))]
    pub donor_document: Option<String>,

    #[validate(required(message = "O tipo da doação é obrigatório."))]
    pub kind: Option<DonationKind>,

    #[serde(default, deserialize_with = "format::brl_opt::deserialize")]
    #[schema(value_type = Option<String>, example = "500,00")]
    pub amount: Option<Decimal>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    pub item_description: Option<String>,

    pub quantity: Option<i32>,

    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "A data da doação é obrigatória."))]
    #[schema(value_type = String, format = Date, example = "02/03/2025")]
    pub donation_date: Option<NaiveDate>,

    pub notes: Option<String>,
}

impl DonationPayload {
    /// Doação em dinheiro exige valor; doação de itens exige descrição e quantidade.
    pub fn validate_consistency(&self) -> Result<(), (&'static str, ValidationError)> {
        match self.kind {
            Some(DonationKind::Money) => match self.amount {
                Some(amount) if amount > Decimal::ZERO => Ok(()),
                _ => missing("amount", "Informe o valor da doação em dinheiro."),
            },
            Some(DonationKind::Item) => {
                if self.item_description.is_none() {
                    return missing("itemDescription", "Descreva os itens doados.");
                }
                match self.quantity {
                    Some(q) if q > 0 => Ok(()),
                    _ => missing("quantity", "Informe a quantidade de itens."),
                }
            }
            None => Ok(()),
        }
    }
}

fn missing(field: &'static str, message: &'static str) -> Result<(), (&'static str, ValidationError)> {
    let mut e = ValidationError::new("required");
    e.message = Some(message.into());
    Err((field, e))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DonationFilter {
    pub kind: Option<DonationKind>,
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
}
