// src/models/dashboard.rs

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::dates::age_on;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonKind {
    Employee,
    Resident,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayEntry {
    pub id: Uuid,
    pub kind: PersonKind,
    pub full_name: String,

    #[schema(value_type = String, format = Date)]
    pub birth_date: NaiveDate,

    /// Idade que a pessoa vai completar
    pub turning: u32,
    /// 0 = hoje
    pub days_until: i64,
}

impl BirthdayEntry {
    pub fn new(
        id: Uuid,
        kind: PersonKind,
        full_name: String,
        birth_date: NaiveDate,
        days_until: i64,
        today: NaiveDate,
    ) -> Self {
        let birthday = today
            .checked_add_days(Days::new(days_until.max(0) as u64))
            .unwrap_or(today);
        Self { id, kind, full_name, birth_date, turning: age_on(birth_date, birthday), days_until }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BirthdayQuery {
    /// Janela em dias (padrão 30)
    pub days: Option<i64>,
}

impl BirthdayQuery {
    pub fn window(&self) -> i64 {
        self.days.unwrap_or(30).clamp(0, 366)
    }
}

// Os cards do topo
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_employees: i64,
    pub active_residents: i64,

    pub receivables_month: Decimal, // A receber no mês (em aberto)
    pub payables_month: Decimal,    // A pagar no mês (em aberto)
    pub overdue_receivables: i64,
    pub overdue_payables: i64,

    pub bank_balance: Decimal, // Saldo somado das contas ativas

    pub pending_reminders: i64,
    pub expiring_licenses: i64,

    pub birthdays: Vec<BirthdayEntry>,
}

// Linha agregada lida do banco (sem os aniversariantes)
#[derive(Debug, sqlx::FromRow)]
pub struct DashboardCounters {
    pub active_employees: i64,
    pub active_residents: i64,
    pub receivables_month: Decimal,
    pub payables_month: Decimal,
    pub overdue_receivables: i64,
    pub overdue_payables: i64,
    pub bank_balance: Decimal,
    pub pending_reminders: i64,
    pub expiring_licenses: i64,
}
