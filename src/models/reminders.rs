// src/models/reminders.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::format;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reminder_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "recurrence", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,

    #[schema(example = "Renovar alvará sanitário")]
    pub title: String,
    pub description: Option<String>,

    #[schema(value_type = String, format = Date, example = "2025-04-01")]
    pub remind_on: NaiveDate,

    pub priority: ReminderPriority,
    pub recurrence: Recurrence,

    // Dia de referência das recorrências mensais/anuais
    #[serde(skip)]
    pub anchor_day: i16,

    pub is_done: bool,

    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "A data do lembrete é obrigatória."))]
    #[schema(value_type = String, format = Date, example = "01/04/2025")]
    pub remind_on: Option<NaiveDate>,

    #[serde(default)]
    pub priority: ReminderPriority,

    #[serde(default)]
    pub recurrence: Recurrence,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReminderFilter {
    /// true: só pendentes; false: só concluídos
    pub pending: Option<bool>,
    #[param(value_type = Option<String>, format = Date)]
    pub until: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedReminder {
    pub completed: Reminder,
    /// Próxima ocorrência, para lembretes recorrentes
    pub next: Option<Reminder>,
}
