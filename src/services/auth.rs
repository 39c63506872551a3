// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AuditRepository, UserRepository},
    models::{
        activity::AuditAction,
        auth::{Claims, ProvisionUserPayload, User, UserRole},
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    audit_repo: AuditRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        audit_repo: AuditRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, audit_repo, jwt_secret, pool }
    }

    /// Cria credenciais + perfil numa transação só.
    /// `created_by` é None no comando de bootstrap do primeiro administrador.
    pub async fn provision_user(
        &self,
        payload: &ProvisionUserPayload,
        created_by: Option<Uuid>,
    ) -> Result<User, AppError> {
        // 1. Hashing (fora da transação, não toca no banco)
        let password_clone = payload.password.clone();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let role = payload.role.unwrap_or(UserRole::Staff);

        // 2. Usuário + perfil + auditoria: tudo ou nada
        let mut tx = self.pool.begin().await?;

        let user_id = self
            .user_repo
            .create_user(&mut *tx, &payload.email, &hashed_password)
            .await?;

        self.user_repo
            .create_profile(&mut *tx, user_id, &payload.full_name, role)
            .await?;

        if let Some(actor) = created_by {
            self.audit_repo
                .record(
                    &mut *tx,
                    actor,
                    "users",
                    AuditAction::Create,
                    Some(user_id),
                    &format!("Usuário criado: {} ({:?})", payload.email.trim(), role),
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!("👤 Usuário {} provisionado com papel {:?}", payload.email.trim(), role);

        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list(&self.pool).await
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AppError::Forbidden("Usuário desativado.".into()));
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let user_id = self.decode_token(token)?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::Forbidden("Usuário desativado.".into()));
        }
        Ok(user)
    }

    fn decode_token(&self, token: &str) -> Result<Uuid, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        Ok(token_data.claims.sub)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service() -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/crevin_test")
            .unwrap();
        AuthService::new(
            UserRepository::new(pool.clone()),
            AuditRepository::new(pool.clone()),
            "segredo-de-teste".into(),
            pool,
        )
    }

    #[tokio::test]
    async fn token_roundtrip() {
        let svc = service();
        let id = Uuid::new_v4();
        let token = svc.create_token(id).unwrap();
        assert_eq!(svc.decode_token(&token).unwrap(), id);
    }

    #[tokio::test]
    async fn rejects_garbage_and_foreign_tokens() {
        let svc = service();
        assert!(matches!(svc.decode_token("nao-e-um-jwt"), Err(AppError::InvalidToken)));

        let mut other = service();
        other.jwt_secret = "outro-segredo".into();
        let token = other.create_token(Uuid::new_v4()).unwrap();
        assert!(matches!(svc.decode_token(&token), Err(AppError::InvalidToken)));
    }

    fn db_service(pool: PgPool) -> AuthService {
        AuthService::new(
            UserRepository::new(pool.clone()),
            AuditRepository::new(pool.clone()),
            "segredo-de-teste".into(),
            pool,
        )
    }

    fn new_user(email: &str) -> ProvisionUserPayload {
        ProvisionUserPayload {
            email: email.into(),
            password: "senha-forte-123".into(),
            full_name: "Maria Aparecida".into(),
            role: Some(UserRole::Manager),
        }
    }

    #[sqlx::test]
    #[ignore]
    async fn token_of_a_deleted_user_is_invalid(pool: PgPool) {
        let svc = db_service(pool.clone());
        let user = svc.provision_user(&new_user("maria@crevin.org"), None).await.unwrap();
        let token = svc.login_user("maria@crevin.org", "senha-forte-123").await.unwrap();
        assert_eq!(svc.validate_token(&token).await.unwrap().id, user.id);

        sqlx::query("DELETE FROM users WHERE id = $1").bind(user.id).execute(&pool).await.unwrap();
        assert!(matches!(svc.validate_token(&token).await, Err(AppError::InvalidToken)));
    }

    #[sqlx::test]
    #[ignore]
    async fn duplicate_email_is_a_conflict_and_leaves_no_orphans(pool: PgPool) {
        let svc = db_service(pool.clone());
        svc.provision_user(&new_user("maria@crevin.org"), None).await.unwrap();

        let again = svc.provision_user(&new_user("maria@crevin.org"), None).await;
        assert!(matches!(again, Err(AppError::UniqueConstraintViolation(_))));

        let (users, profiles): (i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM users), (SELECT COUNT(*) FROM profiles)",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!((users, profiles), (1, 1));
    }
}
