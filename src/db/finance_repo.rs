// src/db/finance_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::finance::{
        BankAccount, BankAccountPayload, CategoryKind, CategoryPayload, FinancialCategory, Payable,
        PayablePayload, Receivable, ReceivablePayload, SettlePayload, TitleFilter,
    },
};

const TITLE_REFERENCE: &str = "Categoria, conta, idoso ou fornecedor inexistente.";

// Baixa só sai de PENDING/OVERDUE
const ALREADY_CLOSED: &str = "Lançamento já baixado ou cancelado.";

// Filtro de situação efetiva: PENDING vencido conta como OVERDUE.
// $1 = status, $2 = hoje, $3/$4 = intervalo de vencimento.
const STATUS_FILTER: &str = r#"
    ($1::payment_status IS NULL
        OR ($1 = 'OVERDUE' AND status IN ('PENDING', 'OVERDUE') AND due_date < $2)
        OR ($1 = 'PENDING' AND status = 'PENDING' AND due_date >= $2)
        OR ($1 IN ('PAID', 'CANCELLED') AND status = $1))
    AND ($3::date IS NULL OR due_date >= $3)
    AND ($4::date IS NULL OR due_date <= $4)
"#;

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CONTAS BANCÁRIAS
    // =========================================================================

    pub async fn create_account<'e, E>(
        &self,
        executor: E,
        payload: &BankAccountPayload,
    ) -> Result<BankAccount, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let account = sqlx::query_as::<_, BankAccount>(
            r#"
            INSERT INTO bank_accounts (bank_name, agency, account_number, account_kind, current_balance, is_active)
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, TRUE))
            RETURNING *
            "#,
        )
        .bind(payload.bank_name.trim())
        .bind(&payload.agency)
        .bind(&payload.account_number)
        .bind(&payload.account_kind)
        .bind(payload.current_balance)
        .bind(payload.is_active)
        .fetch_one(executor)
        .await?;

        Ok(account)
    }

    pub async fn list_accounts(&self) -> Result<Vec<BankAccount>, AppError> {
        let accounts = sqlx::query_as::<_, BankAccount>(
            "SELECT * FROM bank_accounts ORDER BY is_active DESC, bank_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    pub async fn update_account<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &BankAccountPayload,
    ) -> Result<BankAccount, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BankAccount>(
            r#"
            UPDATE bank_accounts SET
                bank_name = $2, agency = $3, account_number = $4, account_kind = $5,
                current_balance = COALESCE($6, current_balance),
                is_active = COALESCE($7, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.bank_name.trim())
        .bind(&payload.agency)
        .bind(&payload.account_number)
        .bind(&payload.account_kind)
        .bind(payload.current_balance)
        .bind(payload.is_active)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Conta bancária".into()))
    }

    pub async fn delete_account<'e, E>(&self, executor: E, id: Uuid) -> Result<BankAccount, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BankAccount>("DELETE FROM bank_accounts WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Conta bancária".into()))
    }

    /// Soma (ou subtrai, com valor negativo) do saldo da conta.
    pub async fn adjust_balance<'e, E>(&self, executor: E, id: Uuid, delta: Decimal) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE bank_accounts SET current_balance = current_balance + $2 WHERE id = $1",
        )
        .bind(id)
        .bind(delta)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Conta bancária".into()));
        }
        Ok(())
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        payload: &CategoryPayload,
    ) -> Result<FinancialCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, FinancialCategory>(
            r#"
            INSERT INTO financial_categories (name, kind, color)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.kind)
        .bind(&payload.color)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Já existe uma categoria com este nome e tipo.", "Referência inválida."))?;

        Ok(category)
    }

    pub async fn list_categories(&self, kind: Option<CategoryKind>) -> Result<Vec<FinancialCategory>, AppError> {
        let categories = sqlx::query_as::<_, FinancialCategory>(
            r#"
            SELECT * FROM financial_categories
            WHERE ($1::category_kind IS NULL OR kind = $1)
            ORDER BY kind ASC, name ASC
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn find_category_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
        kind: CategoryKind,
    ) -> Result<Option<FinancialCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, FinancialCategory>(
            "SELECT * FROM financial_categories WHERE lower(name) = lower($1) AND kind = $2",
        )
        .bind(name)
        .bind(kind)
        .fetch_optional(executor)
        .await?;
        Ok(category)
    }

    pub async fn delete_category<'e, E>(&self, executor: E, id: Uuid) -> Result<FinancialCategory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let in_use = "Categoria em uso por lançamentos financeiros.";
        sqlx::query_as::<_, FinancialCategory>("DELETE FROM financial_categories WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_constraint_error(e, in_use, in_use))?
            .ok_or_else(|| AppError::NotFound("Categoria".into()))
    }

    // =========================================================================
    //  CONTAS A RECEBER
    // =========================================================================

    pub async fn create_receivable<'e, E>(
        &self,
        executor: E,
        payload: &ReceivablePayload,
    ) -> Result<Receivable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let receivable = sqlx::query_as::<_, Receivable>(
            r#"
            INSERT INTO receivables (
                description, amount, due_date, status, category_id, resident_id,
                bank_account_id, payment_method, notes
            )
            VALUES ($1, $2, $3, COALESCE($4, 'PENDING'), $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(payload.description.trim())
        .bind(payload.amount)
        .bind(payload.due_date)
        .bind(payload.status)
        .bind(payload.category_id)
        .bind(payload.resident_id)
        .bind(payload.bank_account_id)
        .bind(&payload.payment_method)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Lançamento duplicado.", TITLE_REFERENCE))?;

        Ok(receivable)
    }

    /// Mensalidade de uma competência. `None` quando já existia.
    pub async fn insert_monthly_fee<'e, E>(
        &self,
        executor: E,
        resident_id: Uuid,
        reference_month: NaiveDate,
        description: &str,
        amount: Decimal,
        due_date: NaiveDate,
        category_id: Option<Uuid>,
    ) -> Result<Option<Receivable>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let receivable = sqlx::query_as::<_, Receivable>(
            r#"
            INSERT INTO receivables (description, amount, due_date, category_id, resident_id, reference_month)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (resident_id, reference_month) WHERE reference_month IS NOT NULL
            DO NOTHING
            RETURNING *
            "#,
        )
        .bind(description)
        .bind(amount)
        .bind(due_date)
        .bind(category_id)
        .bind(resident_id)
        .bind(reference_month)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Mensalidade já gerada.", TITLE_REFERENCE))?;

        Ok(receivable)
    }

    pub async fn update_receivable<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &ReceivablePayload,
    ) -> Result<Receivable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Receivable>(
            r#"
            UPDATE receivables SET
                description = $2, amount = $3, due_date = $4,
                status = COALESCE($5, status), category_id = $6, resident_id = $7,
                bank_account_id = $8, payment_method = $9, notes = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.description.trim())
        .bind(payload.amount)
        .bind(payload.due_date)
        .bind(payload.status)
        .bind(payload.category_id)
        .bind(payload.resident_id)
        .bind(payload.bank_account_id)
        .bind(&payload.payment_method)
        .bind(&payload.notes)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Mensalidade já gerada para esta competência.", TITLE_REFERENCE))?
        .ok_or_else(|| AppError::NotFound("Conta a receber".into()))
    }

    pub async fn find_receivable<'e, E>(&self, executor: E, id: Uuid) -> Result<Receivable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Receivable>("SELECT * FROM receivables WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Conta a receber".into()))
    }

    /// Lê e trava a linha até o fim da transação.
    pub async fn find_receivable_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Receivable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Receivable>("SELECT * FROM receivables WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Conta a receber".into()))
    }

    pub async fn list_receivables(
        &self,
        filter: &TitleFilter,
        today: NaiveDate,
    ) -> Result<Vec<Receivable>, AppError> {
        let sql = format!(
            "SELECT * FROM receivables WHERE {STATUS_FILTER} AND ($5::uuid IS NULL OR resident_id = $5) ORDER BY due_date ASC, description ASC"
        );
        let receivables = sqlx::query_as::<_, Receivable>(&sql)
            .bind(filter.status)
            .bind(today)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.resident_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(receivables)
    }

    pub async fn delete_receivable<'e, E>(&self, executor: E, id: Uuid) -> Result<Receivable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Receivable>("DELETE FROM receivables WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Conta a receber".into()))
    }

    pub async fn settle_receivable<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        settled_at: NaiveDate,
        payload: &SettlePayload,
    ) -> Result<Receivable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Receivable>(
            r#"
            UPDATE receivables SET
                status = 'PAID', settled_at = $2,
                bank_account_id = COALESCE($3, bank_account_id),
                payment_method = COALESCE($4, payment_method),
                updated_at = NOW()
            WHERE id = $1 AND status IN ('PENDING', 'OVERDUE')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(settled_at)
        .bind(payload.bank_account_id)
        .bind(&payload.payment_method)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Lançamento duplicado.", TITLE_REFERENCE))?
        .ok_or_else(|| AppError::Conflict(ALREADY_CLOSED.into()))
    }

    // =========================================================================
    //  CONTAS A PAGAR
    // =========================================================================

    pub async fn create_payable<'e, E>(
        &self,
        executor: E,
        payload: &PayablePayload,
    ) -> Result<Payable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payable = sqlx::query_as::<_, Payable>(
            r#"
            INSERT INTO payables (
                description, amount, due_date, status, category_id, supplier_id,
                bank_account_id, payment_method, notes
            )
            VALUES ($1, $2, $3, COALESCE($4, 'PENDING'), $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(payload.description.trim())
        .bind(payload.amount)
        .bind(payload.due_date)
        .bind(payload.status)
        .bind(payload.category_id)
        .bind(payload.supplier_id)
        .bind(payload.bank_account_id)
        .bind(&payload.payment_method)
        .bind(&payload.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Lançamento duplicado.", TITLE_REFERENCE))?;

        Ok(payable)
    }

    pub async fn update_payable<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &PayablePayload,
    ) -> Result<Payable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Payable>(
            r#"
            UPDATE payables SET
                description = $2, amount = $3, due_date = $4,
                status = COALESCE($5, status), category_id = $6, supplier_id = $7,
                bank_account_id = $8, payment_method = $9, notes = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.description.trim())
        .bind(payload.amount)
        .bind(payload.due_date)
        .bind(payload.status)
        .bind(payload.category_id)
        .bind(payload.supplier_id)
        .bind(payload.bank_account_id)
        .bind(&payload.payment_method)
        .bind(&payload.notes)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Lançamento duplicado.", TITLE_REFERENCE))?
        .ok_or_else(|| AppError::NotFound("Conta a pagar".into()))
    }

    pub async fn find_payable<'e, E>(&self, executor: E, id: Uuid) -> Result<Payable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Payable>("SELECT * FROM payables WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Conta a pagar".into()))
    }

    /// Lê e trava a linha até o fim da transação.
    pub async fn find_payable_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Payable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Payable>("SELECT * FROM payables WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Conta a pagar".into()))
    }

    pub async fn list_payables(&self, filter: &TitleFilter, today: NaiveDate) -> Result<Vec<Payable>, AppError> {
        let sql = format!(
            "SELECT * FROM payables WHERE {STATUS_FILTER} AND ($5::uuid IS NULL OR supplier_id = $5) ORDER BY due_date ASC, description ASC"
        );
        let payables = sqlx::query_as::<_, Payable>(&sql)
            .bind(filter.status)
            .bind(today)
            .bind(filter.from)
            .bind(filter.to)
            .bind(filter.supplier_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(payables)
    }

    pub async fn delete_payable<'e, E>(&self, executor: E, id: Uuid) -> Result<Payable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Payable>("DELETE FROM payables WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound("Conta a pagar".into()))
    }

    pub async fn settle_payable<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        settled_at: NaiveDate,
        payload: &SettlePayload,
    ) -> Result<Payable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Payable>(
            r#"
            UPDATE payables SET
                status = 'PAID', settled_at = $2,
                bank_account_id = COALESCE($3, bank_account_id),
                payment_method = COALESCE($4, payment_method),
                updated_at = NOW()
            WHERE id = $1 AND status IN ('PENDING', 'OVERDUE')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(settled_at)
        .bind(payload.bank_account_id)
        .bind(&payload.payment_method)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Lançamento duplicado.", TITLE_REFERENCE))?
        .ok_or_else(|| AppError::Conflict(ALREADY_CLOSED.into()))
    }
}
