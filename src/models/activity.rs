// src/models/activity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "audit_action", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,

    #[schema(example = "Layanne Souza")]
    pub user_name: Option<String>,

    #[schema(example = "residents")]
    pub entity: String,

    pub action: AuditAction,
    pub record_id: Option<Uuid>,

    #[schema(example = "Idoso cadastrado: Maria das Dores")]
    pub description: String,

    pub created_at: DateTime<Utc>,

    /// Posição do evento no feed, usada em `after`
    #[schema(example = "7345:120")]
    pub cursor: String,
}

/// Posição no feed: transação que gravou o evento e sequência dentro dela.
/// Só entram no polling eventos de transações já encerradas, então nada
/// aparece atrás de um cursor já entregue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActivityCursor {
    pub tx_id: u64,
    pub seq: i64,
}

impl ActivityCursor {
    pub fn parse(raw: &str) -> Option<Self> {
        let (tx_id, seq) = raw.trim().split_once(':')?;
        Some(Self { tx_id: tx_id.parse().ok()?, seq: seq.parse().ok()? })
    }
}

impl std::fmt::Display for ActivityCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tx_id, self.seq)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeed {
    pub items: Vec<AuditLog>,

    /// Passe em `after` na próxima consulta
    #[schema(example = "7345:120")]
    pub next_cursor: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    /// Carga inicial: mais recentes primeiro, opcionalmente só após este instante
    pub since: Option<DateTime<Utc>>,
    /// Polling: eventos depois deste cursor, em ordem de gravação
    pub after: Option<String>,
    /// Máximo de itens (padrão 20, limite 100)
    pub limit: Option<i64>,
}

impl ActivityQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_parses_its_own_output() {
        let cursor = ActivityCursor { tx_id: 7345, seq: 120 };
        assert_eq!(cursor.to_string(), "7345:120");
        assert_eq!(ActivityCursor::parse("7345:120"), Some(cursor));
        assert_eq!(ActivityCursor::parse("0:0"), Some(ActivityCursor::default()));
    }

    #[test]
    fn malformed_cursors_are_rejected() {
        for raw in ["", "7345", "a:1", "1:b", "-1:3", "1:2:3"] {
            assert_eq!(ActivityCursor::parse(raw), None, "{raw}");
        }
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(ActivityQuery::default().effective_limit(), 20);
        let big = ActivityQuery { limit: Some(1000), ..Default::default() };
        assert_eq!(big.effective_limit(), 100);
        let zero = ActivityQuery { limit: Some(0), ..Default::default() };
        assert_eq!(zero.effective_limit(), 1);
    }
}
