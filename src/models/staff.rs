// src/models/staff.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{dates::HasBirthDate, format};

// =========================================================================
//  DEPARTAMENTOS
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: Uuid,

    #[schema(example = "Enfermagem")]
    pub name: String,

    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome do departamento é obrigatório."))]
    #[schema(example = "Enfermagem")]
    pub name: String,

    pub description: Option<String>,

    pub is_active: Option<bool>,
}

// =========================================================================
//  FUNCIONÁRIOS
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "employee_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Active,     // Ativo
    OnLeave,    // Afastado
    Vacation,   // Férias
    Terminated, // Desligado
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,

    #[schema(example = "João Pereira")]
    pub full_name: String,

    #[schema(example = "529.982.247-25")]
    pub cpf: String,

    pub rg: Option<String>,

    #[schema(value_type = String, format = Date, example = "1985-04-12")]
    pub birth_date: NaiveDate,

    #[schema(example = "(11) 98765-4321")]
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub zip_code: Option<String>,

    #[schema(example = "Técnico de Enfermagem")]
    pub position: String,

    pub department_id: Option<Uuid>,

    #[schema(value_type = String, format = Date, example = "2020-02-01")]
    pub hire_date: NaiveDate,

    #[schema(value_type = Option<String>, format = Date)]
    pub termination_date: Option<NaiveDate>,

    #[schema(example = "2850.00")]
    pub salary: Option<Decimal>,

    pub status: EmployeeStatus,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HasBirthDate for Employee {
    fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }
}

// Formulário de cadastro/edição (o mesmo para os dois)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "João Pereira")]
    pub full_name: String,

    #[serde(default)]
    #[validate(custom(function = "format::validate_cpf"))]
    #[schema(example = "529.982.247-25")]
    pub cpf: String,

    pub rg: Option<String>,

    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "A data de nascimento é obrigatória."))]
    #[schema(value_type = String, format = Date, example = "12/04/1985")]
    pub birth_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(custom(function = "format::validate_phone"))]
    #[schema(example = "11987654321")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub address: Option<String>,

    #[serde(default, deserialize_with = "format::opt_text::deserialize")]
    #[validate(custom(function = "format::validate_cep"))]
    #[schema(example = "01310-100")]
    pub zip_code: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "O cargo é obrigatório."))]
    #[schema(example = "Técnico de Enfermagem")]
    pub position: String,

    pub department_id: Option<Uuid>,

    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "A data de admissão é obrigatória."))]
    #[schema(value_type = String, format = Date, example = "01/02/2020")]
    pub hire_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "format::brl_opt::deserialize")]
    #[schema(value_type = Option<String>, example = "2.850,00")]
    pub salary: Option<Decimal>,

    pub status: Option<EmployeeStatus>,

    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilter {
    /// Nome ou CPF (parcial)
    pub search: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub department_id: Option<Uuid>,
}
