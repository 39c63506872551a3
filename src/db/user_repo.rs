// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::auth::{User, UserRole},
};

// Colunas do usuário autenticado: credenciais + perfil
const USER_COLUMNS: &str = r#"
    u.id, u.email, u.password_hash,
    p.full_name, p.role, p.is_active,
    u.created_at, u.updated_at
"#;

// O repositório de usuários: tabelas 'users' e 'profiles'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo e-mail (login)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN profiles p ON p.user_id = u.id WHERE lower(u.email) = lower($1)"
        );
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo ID (validação do token)
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN profiles p ON p.user_id = u.id WHERE u.id = $1"
        );
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN profiles p ON p.user_id = u.id ORDER BY p.full_name ASC"
        );
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(executor).await?;
        Ok(users)
    }

    // Cria as credenciais. Retorna o ID gerado.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
    ) -> Result<Uuid, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (email, password_hash) VALUES (lower($1), $2) RETURNING id",
        )
        .bind(email.trim())
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "Este e-mail já está em uso.", "Referência inválida."))?;

        Ok(id)
    }

    // Cria o perfil (nome + papel) do usuário
    pub async fn create_profile<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        full_name: &str,
        role: UserRole,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO profiles (user_id, full_name, role) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(full_name.trim())
            .bind(role)
            .execute(executor)
            .await?;
        Ok(())
    }
}
