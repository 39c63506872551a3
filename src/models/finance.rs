// src/models/finance.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use sqlx::FromRow;
use chrono::{DateTime, Utc, NaiveDate};
use rust_decimal::Decimal;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::common::format;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "category_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryKind {
    Income,  // Receita
    Expense, // Despesa
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,   // Em aberto
    Paid,      // Pago / Recebido
    Cancelled, // Cancelado
    Overdue,   // Vencido (calculado na leitura)
}

fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// =========================================================================
//  CONTAS BANCÁRIAS
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: Uuid,

    #[schema(example = "Banco do Brasil")]
    pub bank_name: String,
    #[schema(example = "1234-5")]
    pub agency: Option<String>,
    #[schema(example = "98765-0")]
    pub account_number: Option<String>,
    #[schema(example = "Corrente")]
    pub account_kind: Option<String>,

    #[schema(example = "15000.50")]
    pub current_balance: Decimal,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O banco é obrigatório."))]
    pub bank_name: String,

    pub agency: Option<String>,
    pub account_number: Option<String>,
    pub account_kind: Option<String>,

    #[serde(default, deserialize_with = "format::brl_opt::deserialize")]
    #[schema(value_type = Option<String>, example = "15.000,50")]
    pub current_balance: Option<Decimal>,

    pub is_active: Option<bool>,
}

// =========================================================================
//  CATEGORIAS
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialCategory {
    pub id: Uuid,

    #[schema(example = "Mensalidades")]
    pub name: String,

    pub kind: CategoryKind,

    #[schema(example = "#2E7D32")]
    pub color: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome da categoria é obrigatório."))]
    pub name: String,

    #[validate(required(message = "O tipo da categoria é obrigatório."))]
    pub kind: Option<CategoryKind>,

    pub color: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryFilter {
    pub kind: Option<CategoryKind>,
}

// =========================================================================
//  CONTAS A RECEBER
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    pub id: Uuid,

    #[schema(example = "Mensalidade 03/2025 - Maria das Dores")]
    pub description: String,

    #[schema(example = "988.40")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2025-03-10")]
    pub due_date: NaiveDate,

    pub status: PaymentStatus,

    pub category_id: Option<Uuid>,
    pub resident_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,

    #[schema(example = "PIX")]
    pub payment_method: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub settled_at: Option<NaiveDate>,

    // Competência da mensalidade (primeiro dia do mês), quando gerada automaticamente
    #[schema(value_type = Option<String>, format = Date, example = "2025-03-01")]
    pub reference_month: Option<NaiveDate>,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceivablePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[serde(default, deserialize_with = "format::brl_opt::deserialize")]
    #[validate(required(message = "O valor é obrigatório."), custom(function = "validate_positive"))]
    #[schema(value_type = String, example = "988,40")]
    pub amount: Option<Decimal>,

    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "O vencimento é obrigatório."))]
    #[schema(value_type = String, format = Date, example = "10/03/2025")]
    pub due_date: Option<NaiveDate>,

    pub category_id: Option<Uuid>,
    pub resident_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,

    // Permite cancelar pelo formulário de edição
    pub status: Option<PaymentStatus>,
}

// =========================================================================
//  CONTAS A PAGAR
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payable {
    pub id: Uuid,

    #[schema(example = "Conta de energia - março")]
    pub description: String,

    #[schema(example = "1250.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2025-03-15")]
    pub due_date: NaiveDate,

    pub status: PaymentStatus,

    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,

    pub payment_method: Option<String>,

    #[schema(value_type = Option<String>, format = Date)]
    pub settled_at: Option<NaiveDate>,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayablePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[serde(default, deserialize_with = "format::brl_opt::deserialize")]
    #[validate(required(message = "O valor é obrigatório."), custom(function = "validate_positive"))]
    #[schema(value_type = String, example = "1.250,00")]
    pub amount: Option<Decimal>,

    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "O vencimento é obrigatório."))]
    #[schema(value_type = String, format = Date, example = "15/03/2025")]
    pub due_date: Option<NaiveDate>,

    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub status: Option<PaymentStatus>,
}

// =========================================================================
//  BAIXA (PAGAMENTO / RECEBIMENTO)
// =========================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettlePayload {
    /// Data da baixa; hoje se omitida
    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[schema(value_type = Option<String>, format = Date, example = "12/03/2025")]
    pub settled_at: Option<NaiveDate>,

    pub bank_account_id: Option<Uuid>,

    #[schema(example = "PIX")]
    pub payment_method: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TitleFilter {
    /// Situação efetiva (PENDING exclui os vencidos; OVERDUE só os vencidos)
    pub status: Option<PaymentStatus>,
    #[param(value_type = Option<String>, format = Date)]
    pub from: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub to: Option<NaiveDate>,
    pub resident_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
}

// =========================================================================
//  MENSALIDADES
// =========================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFeePayload {
    #[validate(range(min = 2000, max = 2100, message = "Ano inválido."))]
    #[schema(example = 2025)]
    pub year: i32,

    #[validate(range(min = 1, max = 12, message = "Mês inválido."))]
    #[schema(example = 3)]
    pub month: u32,

    /// Dia de vencimento (limitado ao último dia do mês)
    #[validate(range(min = 1, max = 31, message = "Dia de vencimento inválido."))]
    #[serde(default = "default_due_day")]
    #[schema(example = 10)]
    pub due_day: u32,

    pub category_id: Option<Uuid>,
}

fn default_due_day() -> u32 {
    10
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyFeeReport {
    #[schema(value_type = String, format = Date, example = "2025-03-01")]
    pub reference_month: NaiveDate,

    pub generated: Vec<Receivable>,

    /// Idosos que já tinham a mensalidade da competência
    pub already_generated: Vec<Uuid>,

    /// Idosos ativos sem benefício ou percentual cadastrados
    pub without_benefit: Vec<Uuid>,
}
