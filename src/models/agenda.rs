// src/models/agenda.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "event_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Meeting,     // Reunião
    Appointment, // Consulta / atendimento
    Event,       // Evento da instituição
    #[default]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEvent {
    pub id: Uuid,

    #[schema(example = "Consulta cardiologista")]
    pub title: String,
    pub description: Option<String>,

    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,

    pub location: Option<String>,
    pub kind: EventKind,

    pub resident_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEventPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,

    pub description: Option<String>,

    #[validate(required(message = "O início é obrigatório."))]
    #[schema(example = "2025-03-20T13:00:00Z")]
    pub starts_at: Option<DateTime<Utc>>,

    #[validate(required(message = "O término é obrigatório."))]
    #[schema(example = "2025-03-20T14:00:00Z")]
    pub ends_at: Option<DateTime<Utc>>,

    pub location: Option<String>,

    #[serde(default)]
    pub kind: EventKind,

    pub resident_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
}

impl AgendaEventPayload {
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        if let (Some(start), Some(end)) = (self.starts_at, self.ends_at) {
            if end < start {
                let mut err = ValidationError::new("range");
                err.message = Some("O término deve ser posterior ao início.".into());
                return Err(err);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AgendaFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub resident_id: Option<Uuid>,
}
