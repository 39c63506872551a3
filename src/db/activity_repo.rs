// src/db/activity_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::activity::{ActivityCursor, AuditAction, AuditLog},
};

const LOG_COLUMNS: &str = "a.id, a.user_id, p.full_name AS user_name, a.entity, a.action, \
     a.record_id, a.description, a.created_at, a.tx_id::text || ':' || a.seq::text AS cursor";

// Trilha de auditoria (tabela audit_logs)
#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registra uma alteração. Deve rodar na mesma transação da alteração.
    pub async fn record<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        entity: &str,
        action: AuditAction,
        record_id: Option<Uuid>,
        description: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (user_id, entity, action, record_id, description)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(entity)
        .bind(action)
        .bind(record_id)
        .bind(description)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Carga inicial do feed, mais recentes primeiro, com o cursor para o
    /// polling seguinte.
    pub async fn list_recent(
        &self,
        since: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<(Vec<AuditLog>, ActivityCursor), AppError> {
        // O cursor vem antes da lista: o que gravar depois fica à frente dele
        let cursor = self.stable_cursor().await?;

        let sql = format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM audit_logs a
            LEFT JOIN profiles p ON p.user_id = a.user_id
            WHERE ($1::timestamptz IS NULL OR a.created_at > $1)
            ORDER BY a.created_at DESC, a.seq DESC
            LIMIT $2
            "#
        );
        let logs = sqlx::query_as::<_, AuditLog>(&sql)
            .bind(since)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok((logs, cursor))
    }

    /// Polling: eventos depois de `after`, na ordem em que foram gravados.
    /// Transações ainda abertas seguram tudo que veio depois delas, para que
    /// nenhum evento caia atrás do cursor.
    pub async fn list_after(&self, after: ActivityCursor, limit: i64) -> Result<Vec<AuditLog>, AppError> {
        let sql = format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM audit_logs a
            LEFT JOIN profiles p ON p.user_id = a.user_id
            WHERE (a.tx_id, a.seq) > ($1::text::xid8, $2)
              AND a.tx_id < pg_snapshot_xmin(pg_current_snapshot())
            ORDER BY a.tx_id ASC, a.seq ASC
            LIMIT $3
            "#
        );
        let logs = sqlx::query_as::<_, AuditLog>(&sql)
            .bind(after.tx_id.to_string())
            .bind(after.seq)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(logs)
    }

    // Último evento de transação já encerrada
    async fn stable_cursor(&self) -> Result<ActivityCursor, AppError> {
        let row: Option<(String, i64)> = sqlx::query_as(
            r#"
            SELECT tx_id::text, seq FROM audit_logs
            WHERE tx_id < pg_snapshot_xmin(pg_current_snapshot())
            ORDER BY tx_id DESC, seq DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((tx_id, seq)) => {
                let tx_id = tx_id
                    .parse()
                    .map_err(|e: std::num::ParseIntError| AppError::InternalServerError(e.into()))?;
                Ok(ActivityCursor { tx_id, seq })
            }
            None => Ok(ActivityCursor::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::seed_user;

    async fn record(repo: &AuditRepository, pool: &PgPool, user_id: Uuid, description: &str) {
        repo.record(pool, user_id, "residents", AuditAction::Create, None, description)
            .await
            .unwrap();
    }

    fn descriptions(logs: &[AuditLog]) -> Vec<&str> {
        logs.iter().map(|l| l.description.as_str()).collect()
    }

    #[sqlx::test]
    #[ignore]
    async fn polling_pages_through_everything_in_order(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let repo = AuditRepository::new(pool.clone());
        for n in 1..=5 {
            record(&repo, &pool, user_id, &format!("evento {n}")).await;
        }

        let mut cursor = ActivityCursor::default();
        let mut seen = Vec::new();
        loop {
            let page = repo.list_after(cursor, 2).await.unwrap();
            if page.is_empty() {
                break;
            }
            assert!(page.len() <= 2);
            cursor = ActivityCursor::parse(&page.last().unwrap().cursor).unwrap();
            seen.extend(page.into_iter().map(|l| l.description));
        }

        assert_eq!(seen, vec!["evento 1", "evento 2", "evento 3", "evento 4", "evento 5"]);
    }

    #[sqlx::test]
    #[ignore]
    async fn open_transactions_hold_back_later_events(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let repo = AuditRepository::new(pool.clone());

        let (_, start) = repo.list_recent(None, 20).await.unwrap();

        // Transação longa: grava antes, confirma depois
        let mut slow = pool.begin().await.unwrap();
        repo.record(&mut *slow, user_id, "residents", AuditAction::Update, None, "lenta")
            .await
            .unwrap();
        record(&repo, &pool, user_id, "rápida").await;

        assert!(repo.list_after(start, 20).await.unwrap().is_empty());

        slow.commit().await.unwrap();
        let page = repo.list_after(start, 20).await.unwrap();
        assert_eq!(descriptions(&page), vec!["lenta", "rápida"]);
    }

    #[sqlx::test]
    #[ignore]
    async fn initial_load_is_newest_first(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let repo = AuditRepository::new(pool.clone());
        for n in 1..=3 {
            record(&repo, &pool, user_id, &format!("evento {n}")).await;
        }

        let (logs, cursor) = repo.list_recent(None, 2).await.unwrap();
        assert_eq!(descriptions(&logs), vec!["evento 3", "evento 2"]);
        assert_eq!(logs[0].user_name.as_deref(), Some("Administração"));
        assert_eq!(cursor.to_string(), logs[0].cursor);
        assert!(repo.list_after(cursor, 20).await.unwrap().is_empty());
    }
}
