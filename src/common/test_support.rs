// Dados mínimos para os testes de banco (#[sqlx::test])

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Usuário com perfil ADMIN, dono das alterações auditadas.
pub async fn seed_user(pool: &PgPool) -> Uuid {
    let user_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash) VALUES ('admin@crevin.org', 'x') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO profiles (user_id, full_name, role) VALUES ($1, 'Administração', 'ADMIN')")
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();

    user_id
}

pub async fn seed_account(pool: &PgPool, balance: Decimal) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO bank_accounts (bank_name, current_balance) VALUES ('Banco do Brasil', $1) RETURNING id",
    )
    .bind(balance)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn account_balance(pool: &PgPool, id: Uuid) -> Decimal {
    sqlx::query_scalar("SELECT current_balance FROM bank_accounts WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn audit_count(pool: &PgPool, entity: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs WHERE entity = $1")
        .bind(entity)
        .fetch_one(pool)
        .await
        .unwrap()
}
