// src/db/dashboard_repo.rs

use chrono::NaiveDate;
use sqlx::{Acquire, Executor, Postgres};

use crate::{common::error::AppError, models::dashboard::DashboardCounters};

// Sem estado: as consultas recebem o executor de quem chama
#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    /// Contadores dos cards, lidos num snapshot só.
    pub async fn get_counters<'e, E>(
        &self,
        executor: E,
        today: NaiveDate,
        month_start: NaiveDate,
        month_end: NaiveDate,
        license_horizon: NaiveDate,
    ) -> Result<DashboardCounters, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let counters = sqlx::query_as::<_, DashboardCounters>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM employees WHERE status <> 'TERMINATED') AS active_employees,
                (SELECT COUNT(*) FROM residents WHERE is_active) AS active_residents,
                (SELECT COALESCE(SUM(amount), 0) FROM receivables
                  WHERE status IN ('PENDING', 'OVERDUE') AND due_date BETWEEN $2 AND $3) AS receivables_month,
                (SELECT COALESCE(SUM(amount), 0) FROM payables
                  WHERE status IN ('PENDING', 'OVERDUE') AND due_date BETWEEN $2 AND $3) AS payables_month,
                (SELECT COUNT(*) FROM receivables
                  WHERE status IN ('PENDING', 'OVERDUE') AND due_date < $1) AS overdue_receivables,
                (SELECT COUNT(*) FROM payables
                  WHERE status IN ('PENDING', 'OVERDUE') AND due_date < $1) AS overdue_payables,
                (SELECT COALESCE(SUM(current_balance), 0) FROM bank_accounts WHERE is_active) AS bank_balance,
                (SELECT COUNT(*) FROM reminders WHERE NOT is_done) AS pending_reminders,
                (SELECT COUNT(*) FROM licenses WHERE expires_on BETWEEN $1 AND $4) AS expiring_licenses
            "#,
        )
        .bind(today)
        .bind(month_start)
        .bind(month_end)
        .bind(license_horizon)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(counters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[sqlx::test]
    #[ignore]
    async fn expiring_licenses_exclude_expired_ones(pool: PgPool) {
        for (name, expires_on) in [
            ("Alvará vencido", d(2025, 3, 14)),
            ("Vence hoje", d(2025, 3, 15)),
            ("Último dia da janela", d(2025, 4, 14)),
            ("Fora da janela", d(2025, 4, 15)),
        ] {
            sqlx::query("INSERT INTO licenses (name, issuing_body, expires_on) VALUES ($1, 'Prefeitura', $2)")
                .bind(name)
                .bind(expires_on)
                .execute(&pool)
                .await
                .unwrap();
        }

        let today = d(2025, 3, 15);
        let counters = DashboardRepository::new()
            .get_counters(&pool, today, d(2025, 3, 1), d(2025, 3, 31), d(2025, 4, 14))
            .await
            .unwrap();

        assert_eq!(counters.expiring_licenses, 2);
    }
}
