// src/services/finance_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{dates, db_utils::field_error, error::AppError, format},
    db::{AuditRepository, FinanceRepository, ResidentRepository},
    models::{
        activity::AuditAction,
        finance::{
            BankAccount, BankAccountPayload, CategoryKind, CategoryPayload, FinancialCategory,
            MonthlyFeePayload, MonthlyFeeReport, Payable, PayablePayload, PaymentStatus, Receivable,
            ReceivablePayload, SettlePayload, TitleFilter,
        },
    },
};

// Categoria usada nas mensalidades quando nenhuma é informada
const MONTHLY_FEE_CATEGORY: &str = "Mensalidades";

/// Valor da mensalidade: benefício × percentual / 100, em centavos.
/// `None` quando falta benefício ou percentual.
pub fn monthly_fee_amount(benefit: Option<Decimal>, percentage: Option<Decimal>) -> Option<Decimal> {
    let (benefit, percentage) = (benefit?, percentage?);
    if benefit <= Decimal::ZERO || percentage <= Decimal::ZERO {
        return None;
    }
    Some(
        (benefit * percentage / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    )
}

pub fn monthly_fee_description(full_name: &str, reference_month: NaiveDate) -> String {
    format!("Mensalidade {} - {}", reference_month.format("%m/%Y"), full_name.trim())
}

/// Em aberto e vencido vira OVERDUE na leitura.
pub fn effective_status(status: PaymentStatus, due_date: NaiveDate, today: NaiveDate) -> PaymentStatus {
    match status {
        PaymentStatus::Pending if due_date < today => PaymentStatus::Overdue,
        other => other,
    }
}

fn check_editable_status(status: Option<PaymentStatus>) -> Result<(), AppError> {
    match status {
        Some(PaymentStatus::Paid) | Some(PaymentStatus::Overdue) => Err(field_error(
            "status",
            "status",
            "Use a baixa para registrar o pagamento.",
        )),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    resident_repo: ResidentRepository,
    audit: AuditRepository,
    pool: PgPool,
}

impl FinanceService {
    pub fn new(
        repo: FinanceRepository,
        resident_repo: ResidentRepository,
        audit: AuditRepository,
        pool: PgPool,
    ) -> Self {
        Self { repo, resident_repo, audit, pool }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    // =========================================================================
    //  CONTAS BANCÁRIAS
    // =========================================================================

    pub async fn create_account(&self, user_id: Uuid, payload: &BankAccountPayload) -> Result<BankAccount, AppError> {
        let mut tx = self.pool.begin().await?;
        let account = self.repo.create_account(&mut *tx, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "bank_accounts", AuditAction::Create, Some(account.id),
                &format!("Conta bancária criada: {}", account.bank_name))
            .await?;
        tx.commit().await?;
        Ok(account)
    }

    pub async fn list_accounts(&self) -> Result<Vec<BankAccount>, AppError> {
        self.repo.list_accounts().await
    }

    pub async fn update_account(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: &BankAccountPayload,
    ) -> Result<BankAccount, AppError> {
        let mut tx = self.pool.begin().await?;
        let account = self.repo.update_account(&mut *tx, id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "bank_accounts", AuditAction::Update, Some(id),
                &format!("Conta bancária atualizada: {}", account.bank_name))
            .await?;
        tx.commit().await?;
        Ok(account)
    }

    pub async fn delete_account(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let account = self.repo.delete_account(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, user_id, "bank_accounts", AuditAction::Delete, Some(id),
                &format!("Conta bancária excluída: {}", account.bank_name))
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn create_category(&self, user_id: Uuid, payload: &CategoryPayload) -> Result<FinancialCategory, AppError> {
        let mut tx = self.pool.begin().await?;
        let category = self.repo.create_category(&mut *tx, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "financial_categories", AuditAction::Create, Some(category.id),
                &format!("Categoria criada: {}", category.name))
            .await?;
        tx.commit().await?;
        Ok(category)
    }

    pub async fn list_categories(&self, kind: Option<CategoryKind>) -> Result<Vec<FinancialCategory>, AppError> {
        self.repo.list_categories(kind).await
    }

    pub async fn delete_category(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let category = self.repo.delete_category(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, user_id, "financial_categories", AuditAction::Delete, Some(id),
                &format!("Categoria excluída: {}", category.name))
            .await?;
        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  CONTAS A RECEBER
    // =========================================================================

    pub async fn create_receivable(&self, user_id: Uuid, payload: &ReceivablePayload) -> Result<Receivable, AppError> {
        check_editable_status(payload.status)?;

        let mut tx = self.pool.begin().await?;
        let receivable = self.repo.create_receivable(&mut *tx, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "receivables", AuditAction::Create, Some(receivable.id),
                &format!("Conta a receber: {} ({})", receivable.description, format::format_brl(receivable.amount)))
            .await?;
        tx.commit().await?;
        Ok(with_receivable_status(receivable, Self::today()))
    }

    pub async fn update_receivable(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: &ReceivablePayload,
    ) -> Result<Receivable, AppError> {
        check_editable_status(payload.status)?;

        let mut tx = self.pool.begin().await?;
        let current = self.repo.find_receivable_for_update(&mut *tx, id).await?;
        check_updatable(current.status)?;

        let receivable = self.repo.update_receivable(&mut *tx, id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "receivables", AuditAction::Update, Some(id),
                &format!("Conta a receber atualizada: {}", receivable.description))
            .await?;
        tx.commit().await?;
        Ok(with_receivable_status(receivable, Self::today()))
    }

    pub async fn get_receivable(&self, id: Uuid) -> Result<Receivable, AppError> {
        let receivable = self.repo.find_receivable(&self.pool, id).await?;
        Ok(with_receivable_status(receivable, Self::today()))
    }

    pub async fn list_receivables(&self, filter: &TitleFilter) -> Result<Vec<Receivable>, AppError> {
        let today = Self::today();
        let receivables = self.repo.list_receivables(filter, today).await?;
        Ok(receivables.into_iter().map(|r| with_receivable_status(r, today)).collect())
    }

    pub async fn delete_receivable(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let receivable = self.repo.delete_receivable(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, user_id, "receivables", AuditAction::Delete, Some(id),
                &format!("Conta a receber excluída: {}", receivable.description))
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Baixa (recebimento). Credita o valor na conta bancária, se houver.
    pub async fn settle_receivable(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: &SettlePayload,
    ) -> Result<Receivable, AppError> {
        let today = Self::today();
        let mut tx = self.pool.begin().await?;

        let current = self.repo.find_receivable_for_update(&mut *tx, id).await?;
        check_settleable(current.status)?;

        let settled_at = payload.settled_at.unwrap_or(today);
        let receivable = self.repo.settle_receivable(&mut *tx, id, settled_at, payload).await?;
        if let Some(account_id) = receivable.bank_account_id {
            self.repo.adjust_balance(&mut *tx, account_id, receivable.amount).await?;
        }
        self.audit
            .record(&mut *tx, user_id, "receivables", AuditAction::Update, Some(id),
                &format!("Recebimento: {} ({})", receivable.description, format::format_brl(receivable.amount)))
            .await?;
        tx.commit().await?;

        Ok(receivable)
    }

    // =========================================================================
    //  CONTAS A PAGAR
    // =========================================================================

    pub async fn create_payable(&self, user_id: Uuid, payload: &PayablePayload) -> Result<Payable, AppError> {
        check_editable_status(payload.status)?;

        let mut tx = self.pool.begin().await?;
        let payable = self.repo.create_payable(&mut *tx, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "payables", AuditAction::Create, Some(payable.id),
                &format!("Conta a pagar: {} ({})", payable.description, format::format_brl(payable.amount)))
            .await?;
        tx.commit().await?;
        Ok(with_payable_status(payable, Self::today()))
    }

    pub async fn update_payable(&self, user_id: Uuid, id: Uuid, payload: &PayablePayload) -> Result<Payable, AppError> {
        check_editable_status(payload.status)?;

        let mut tx = self.pool.begin().await?;
        let current = self.repo.find_payable_for_update(&mut *tx, id).await?;
        check_updatable(current.status)?;

        let payable = self.repo.update_payable(&mut *tx, id, payload).await?;
        self.audit
            .record(&mut *tx, user_id, "payables", AuditAction::Update, Some(id),
                &format!("Conta a pagar atualizada: {}", payable.description))
            .await?;
        tx.commit().await?;
        Ok(with_payable_status(payable, Self::today()))
    }

    pub async fn get_payable(&self, id: Uuid) -> Result<Payable, AppError> {
        let payable = self.repo.find_payable(&self.pool, id).await?;
        Ok(with_payable_status(payable, Self::today()))
    }

    pub async fn list_payables(&self, filter: &TitleFilter) -> Result<Vec<Payable>, AppError> {
        let today = Self::today();
        let payables = self.repo.list_payables(filter, today).await?;
        Ok(payables.into_iter().map(|p| with_payable_status(p, today)).collect())
    }

    pub async fn delete_payable(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let payable = self.repo.delete_payable(&mut *tx, id).await?;
        self.audit
            .record(&mut *tx, user_id, "payables", AuditAction::Delete, Some(id),
                &format!("Conta a pagar excluída: {}", payable.description))
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Baixa (pagamento). Debita o valor da conta bancária, se houver.
    pub async fn settle_payable(&self, user_id: Uuid, id: Uuid, payload: &SettlePayload) -> Result<Payable, AppError> {
        let today = Self::today();
        let mut tx = self.pool.begin().await?;

        let current = self.repo.find_payable_for_update(&mut *tx, id).await?;
        check_settleable(current.status)?;

        let settled_at = payload.settled_at.unwrap_or(today);
        let payable = self.repo.settle_payable(&mut *tx, id, settled_at, payload).await?;
        if let Some(account_id) = payable.bank_account_id {
            self.repo.adjust_balance(&mut *tx, account_id, -payable.amount).await?;
        }
        self.audit
            .record(&mut *tx, user_id, "payables", AuditAction::Update, Some(id),
                &format!("Pagamento: {} ({})", payable.description, format::format_brl(payable.amount)))
            .await?;
        tx.commit().await?;

        Ok(payable)
    }

    // =========================================================================
    //  MENSALIDADES
    // =========================================================================

    /// Gera a mensalidade da competência para cada idoso ativo com benefício.
    /// Rodar de novo não duplica: o índice único (idoso, competência) descarta.
    pub async fn generate_monthly_fees(
        &self,
        user_id: Uuid,
        payload: &MonthlyFeePayload,
    ) -> Result<MonthlyFeeReport, AppError> {
        let reference_month = dates::month_start(payload.year, payload.month)
            .ok_or_else(|| field_error("month", "range", "Competência inválida."))?;
        let due_date = dates::clamp_day(payload.year, payload.month, payload.due_day)
            .ok_or_else(|| field_error("dueDay", "range", "Dia de vencimento inválido."))?;

        let mut tx = self.pool.begin().await?;

        let category_id = match payload.category_id {
            Some(id) => Some(id),
            None => self
                .repo
                .find_category_by_name(&mut *tx, MONTHLY_FEE_CATEGORY, CategoryKind::Income)
                .await?
                .map(|c| c.id),
        };

        let residents = self.resident_repo.list_active(&mut *tx).await?;

        let mut report = MonthlyFeeReport {
            reference_month,
            generated: Vec::new(),
            already_generated: Vec::new(),
            without_benefit: Vec::new(),
        };

        for resident in residents {
            let Some(amount) = monthly_fee_amount(resident.benefit_amount, resident.contribution_percentage) else {
                report.without_benefit.push(resident.id);
                continue;
            };

            let description = monthly_fee_description(&resident.full_name, reference_month);
            let inserted = self
                .repo
                .insert_monthly_fee(&mut *tx, resident.id, reference_month, &description, amount, due_date, category_id)
                .await?;

            match inserted {
                Some(receivable) => report.generated.push(receivable),
                None => report.already_generated.push(resident.id),
            }
        }

        if !report.generated.is_empty() {
            self.audit
                .record(&mut *tx, user_id, "receivables", AuditAction::Create, None,
                    &format!(
                        "Mensalidades {} geradas: {}",
                        reference_month.format("%m/%Y"),
                        report.generated.len()
                    ))
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Mensalidades {}: {} geradas, {} já existiam, {} sem benefício",
            reference_month.format("%m/%Y"),
            report.generated.len(),
            report.already_generated.len(),
            report.without_benefit.len()
        );

        Ok(report)
    }
}

fn check_settleable(status: PaymentStatus) -> Result<(), AppError> {
    match status {
        PaymentStatus::Paid => Err(AppError::Conflict("Este lançamento já foi baixado.".into())),
        PaymentStatus::Cancelled => Err(AppError::Conflict("Lançamento cancelado não pode ser baixado.".into())),
        _ => Ok(()),
    }
}

// Título baixado já movimentou a conta: não volta a ser editado
fn check_updatable(status: PaymentStatus) -> Result<(), AppError> {
    match status {
        PaymentStatus::Paid => Err(AppError::Conflict("Lançamento já baixado não pode ser alterado.".into())),
        _ => Ok(()),
    }
}

fn with_receivable_status(mut r: Receivable, today: NaiveDate) -> Receivable {
    r.status = effective_status(r.status, r.due_date, today);
    r
}

fn with_payable_status(mut p: Payable, today: NaiveDate) -> Payable {
    p.status = effective_status(p.status, p.due_date, today);
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{account_balance, audit_count, seed_account, seed_user};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn monthly_fee_is_rounded_to_cents() {
        assert_eq!(monthly_fee_amount(Some(dec("1412.00")), Some(dec("70"))), Some(dec("988.40")));
        // 1000,01 × 33,33% = 333,303333 → 333,30
        assert_eq!(monthly_fee_amount(Some(dec("1000.01")), Some(dec("33.33"))), Some(dec("333.30")));
        // meio centavo arredonda para cima
        assert_eq!(monthly_fee_amount(Some(dec("0.05")), Some(dec("50"))), Some(dec("0.03")));
    }

    #[test]
    fn monthly_fee_needs_benefit_and_percentage() {
        assert_eq!(monthly_fee_amount(None, Some(dec("70"))), None);
        assert_eq!(monthly_fee_amount(Some(dec("1412")), None), None);
        assert_eq!(monthly_fee_amount(Some(dec("1412")), Some(Decimal::ZERO)), None);
        assert_eq!(monthly_fee_amount(Some(Decimal::ZERO), Some(dec("70"))), None);
    }

    #[test]
    fn monthly_fee_description_uses_reference_month() {
        assert_eq!(
            monthly_fee_description(" Maria das Dores ", d(2025, 3, 1)),
            "Mensalidade 03/2025 - Maria das Dores"
        );
    }

    #[test]
    fn pending_past_due_is_overdue() {
        let today = d(2025, 3, 15);
        assert_eq!(effective_status(PaymentStatus::Pending, d(2025, 3, 14), today), PaymentStatus::Overdue);
        assert_eq!(effective_status(PaymentStatus::Pending, d(2025, 3, 15), today), PaymentStatus::Pending);
        assert_eq!(effective_status(PaymentStatus::Paid, d(2025, 1, 1), today), PaymentStatus::Paid);
        assert_eq!(effective_status(PaymentStatus::Cancelled, d(2025, 1, 1), today), PaymentStatus::Cancelled);
    }

    #[test]
    fn paid_cannot_be_set_by_the_form() {
        assert!(check_editable_status(Some(PaymentStatus::Paid)).is_err());
        assert!(check_editable_status(Some(PaymentStatus::Cancelled)).is_ok());
        assert!(check_editable_status(None).is_ok());
        assert!(check_settleable(PaymentStatus::Paid).is_err());
        assert!(check_settleable(PaymentStatus::Overdue).is_ok());
    }

    #[test]
    fn settled_titles_are_frozen() {
        assert!(matches!(check_updatable(PaymentStatus::Paid), Err(AppError::Conflict(_))));
        assert!(matches!(check_settleable(PaymentStatus::Paid), Err(AppError::Conflict(_))));
        assert!(matches!(check_settleable(PaymentStatus::Cancelled), Err(AppError::Conflict(_))));
        assert!(check_updatable(PaymentStatus::Pending).is_ok());
        assert!(check_updatable(PaymentStatus::Cancelled).is_ok());
    }

    fn receivable(description: &str, amount: &str, account: Option<Uuid>) -> ReceivablePayload {
        ReceivablePayload {
            description: description.into(),
            amount: Some(dec(amount)),
            due_date: Some(d(2030, 1, 10)),
            category_id: None,
            resident_id: None,
            bank_account_id: account,
            payment_method: None,
            notes: None,
            status: None,
        }
    }

    fn service(pool: PgPool) -> FinanceService {
        FinanceService::new(
            FinanceRepository::new(pool.clone()),
            ResidentRepository::new(pool.clone()),
            AuditRepository::new(pool.clone()),
            pool,
        )
    }

    // Precisa de um Postgres em DATABASE_URL: cargo test -- --ignored
    #[sqlx::test]
    #[ignore]
    async fn monthly_fees_are_generated_once_per_month(pool: PgPool) {
        let user_id = seed_user(&pool).await;

        sqlx::query(
            r#"
            INSERT INTO residents (full_name, cpf, birth_date, admission_date, benefit_amount, contribution_percentage)
            VALUES ('Maria das Dores', '529.982.247-25', '1940-06-15', '2024-01-10', 1412.00, 70),
                   ('José Sem Benefício', '111.444.777-35', '1938-02-01', '2024-01-10', NULL, NULL)
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let service = service(pool);
        let payload = MonthlyFeePayload { year: 2025, month: 2, due_day: 31, category_id: None };

        let first = service.generate_monthly_fees(user_id, &payload).await.unwrap();
        assert_eq!(first.generated.len(), 1);
        assert_eq!(first.without_benefit.len(), 1);
        assert_eq!(first.generated[0].amount, dec("988.40"));
        assert_eq!(first.generated[0].due_date, d(2025, 2, 28));

        let second = service.generate_monthly_fees(user_id, &payload).await.unwrap();
        assert!(second.generated.is_empty());
        assert_eq!(second.already_generated.len(), 1);
    }

    #[sqlx::test]
    #[ignore]
    async fn settled_receivable_cannot_be_reopened(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let account = seed_account(&pool, Decimal::ZERO).await;
        let service = service(pool.clone());

        let title = service
            .create_receivable(user_id, &receivable("Doação mensal", "100.00", Some(account)))
            .await
            .unwrap();
        service.settle_receivable(user_id, title.id, &SettlePayload::default()).await.unwrap();
        assert_eq!(account_balance(&pool, account).await, dec("100.00"));

        let mut reopen = receivable("Doação mensal", "100.00", Some(account));
        reopen.status = Some(PaymentStatus::Pending);
        let updated = service.update_receivable(user_id, title.id, &reopen).await;
        assert!(matches!(updated, Err(AppError::Conflict(_))));

        let again = service.settle_receivable(user_id, title.id, &SettlePayload::default()).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        assert_eq!(account_balance(&pool, account).await, dec("100.00"));
        assert_eq!(service.get_receivable(title.id).await.unwrap().status, PaymentStatus::Paid);
    }

    #[sqlx::test]
    #[ignore]
    async fn concurrent_settles_credit_the_account_once(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let account = seed_account(&pool, Decimal::ZERO).await;
        let service = service(pool.clone());

        for _ in 0..10 {
            let title = service
                .create_receivable(user_id, &receivable("Bazar", "100.00", Some(account)))
                .await
                .unwrap();
            let payload = SettlePayload::default();
            let (a, b) = tokio::join!(
                service.settle_receivable(user_id, title.id, &payload),
                service.settle_receivable(user_id, title.id, &payload),
            );
            assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        }

        assert_eq!(account_balance(&pool, account).await, dec("1000.00"));
    }

    #[sqlx::test]
    #[ignore]
    async fn settling_a_payable_debits_the_account(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let account = seed_account(&pool, dec("500.00")).await;
        let service = service(pool.clone());

        let payload = PayablePayload {
            description: "Conta de energia".into(),
            amount: Some(dec("120.50")),
            due_date: Some(d(2030, 1, 15)),
            category_id: None,
            supplier_id: None,
            bank_account_id: None,
            payment_method: None,
            notes: None,
            status: None,
        };
        let title = service.create_payable(user_id, &payload).await.unwrap();

        let settle = SettlePayload {
            settled_at: Some(d(2030, 1, 14)),
            bank_account_id: Some(account),
            payment_method: Some("PIX".into()),
        };
        let paid = service.settle_payable(user_id, title.id, &settle).await.unwrap();

        assert_eq!(paid.status, PaymentStatus::Paid);
        assert_eq!(paid.settled_at, Some(d(2030, 1, 14)));
        assert_eq!(paid.bank_account_id, Some(account));
        assert_eq!(account_balance(&pool, account).await, dec("379.50"));
    }

    #[sqlx::test]
    #[ignore]
    async fn updates_and_deletes_touch_only_their_row(pool: PgPool) {
        let user_id = seed_user(&pool).await;
        let service = service(pool.clone());

        let first = service.create_receivable(user_id, &receivable("Bazar", "50.00", None)).await.unwrap();
        let second = service.create_receivable(user_id, &receivable("Rifa", "30.00", None)).await.unwrap();

        let read = service.get_receivable(first.id).await.unwrap();
        assert_eq!(read.description, "Bazar");
        assert_eq!(read.amount, dec("50.00"));
        assert_eq!(read.due_date, d(2030, 1, 10));

        let mut change = receivable("Bazar de inverno", "75.00", None);
        change.notes = Some("Salão paroquial".into());
        let updated = service.update_receivable(user_id, first.id, &change).await.unwrap();
        assert_eq!(updated.description, "Bazar de inverno");
        assert_eq!(updated.amount, dec("75.00"));
        assert_eq!(updated.notes.as_deref(), Some("Salão paroquial"));

        let untouched = service.get_receivable(second.id).await.unwrap();
        assert_eq!(untouched.description, "Rifa");
        assert_eq!(untouched.amount, dec("30.00"));
        assert_eq!(untouched.updated_at, second.updated_at);

        service.delete_receivable(user_id, first.id).await.unwrap();
        assert!(matches!(service.get_receivable(first.id).await, Err(AppError::NotFound(_))));
        assert!(service.get_receivable(second.id).await.is_ok());

        // criação x2, atualização, exclusão
        assert_eq!(audit_count(&pool, "receivables").await, 4);
    }
}
