// src/services/dashboard_service.rs

use chrono::{Datelike, Days, NaiveDate};
use sqlx::PgPool;

use crate::{
    common::{dates, error::AppError},
    db::DashboardRepository,
    models::dashboard::{BirthdayEntry, DashboardSummary},
    services::{
        license_service::EXPIRING_WINDOW_DAYS, resident_service::ResidentService,
        staff_service::StaffService,
    },
};

// Aniversários exibidos no painel
const BIRTHDAY_WINDOW_DAYS: i64 = 30;

/// Junta funcionários e idosos: mais próximos primeiro, depois por nome.
pub fn merge_birthdays(mut a: Vec<BirthdayEntry>, b: Vec<BirthdayEntry>) -> Vec<BirthdayEntry> {
    a.extend(b);
    a.sort_by(|x, y| x.days_until.cmp(&y.days_until).then_with(|| x.full_name.cmp(&y.full_name)));
    a
}

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    staff: StaffService,
    residents: ResidentService,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, staff: StaffService, residents: ResidentService, pool: PgPool) -> Self {
        Self { repo, staff, residents, pool }
    }

    pub async fn get_summary(&self, today: NaiveDate) -> Result<DashboardSummary, AppError> {
        let month_start = dates::month_start(today.year(), today.month()).unwrap_or(today);
        let month_end = dates::clamp_day(today.year(), today.month(), 31).unwrap_or(today);
        let license_horizon = today
            .checked_add_days(Days::new(EXPIRING_WINDOW_DAYS as u64))
            .unwrap_or(today);

        let counters = self
            .repo
            .get_counters(&self.pool, today, month_start, month_end, license_horizon)
            .await?;

        let birthdays = merge_birthdays(
            self.staff.upcoming_birthdays(today, BIRTHDAY_WINDOW_DAYS).await?,
            self.residents.upcoming_birthdays(today, BIRTHDAY_WINDOW_DAYS).await?,
        );

        Ok(DashboardSummary {
            active_employees: counters.active_employees,
            active_residents: counters.active_residents,
            receivables_month: counters.receivables_month,
            payables_month: counters.payables_month,
            overdue_receivables: counters.overdue_receivables,
            overdue_payables: counters.overdue_payables,
            bank_balance: counters.bank_balance,
            pending_reminders: counters.pending_reminders,
            expiring_licenses: counters.expiring_licenses,
            birthdays,
        })
    }

    pub async fn birthdays(&self, today: NaiveDate, window_days: i64) -> Result<Vec<BirthdayEntry>, AppError> {
        Ok(merge_birthdays(
            self.staff.upcoming_birthdays(today, window_days).await?,
            self.residents.upcoming_birthdays(today, window_days).await?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dashboard::PersonKind;
    use uuid::Uuid;

    fn entry(name: &str, kind: PersonKind, days: i64) -> BirthdayEntry {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let birth = NaiveDate::from_ymd_opt(1940, 6, 15).unwrap();
        BirthdayEntry::new(Uuid::new_v4(), kind, name.to_string(), birth, days, today)
    }

    #[test]
    fn merges_and_sorts_birthdays() {
        let merged = merge_birthdays(
            vec![entry("Bruno", PersonKind::Employee, 3), entry("Ana", PersonKind::Employee, 10)],
            vec![entry("Zilda", PersonKind::Resident, 3), entry("Antônio", PersonKind::Resident, 0)],
        );
        let names: Vec<&str> = merged.iter().map(|e| e.full_name.as_str()).collect();
        assert_eq!(names, vec!["Antônio", "Bruno", "Zilda", "Ana"]);
    }

    #[test]
    fn entry_reports_age_being_turned() {
        // Nascido em 15/06/1940, aniversário hoje: completa 85
        assert_eq!(entry("Antônio", PersonKind::Resident, 0).turning, 85);
    }
}
