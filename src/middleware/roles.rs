// src/middleware/roles.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

/// Define quais papéis podem passar por uma rota.
pub trait RoleRequirement: Send + Sync + 'static {
    fn allowed() -> &'static [UserRole];
    fn denial_message() -> &'static str;
}

/// Extrator guardião: só deixa passar usuários com um dos papéis de `T`.
/// Depende do `auth_guard` ter rodado antes.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleRequirement,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().ok_or(AppError::InvalidToken)?;

        if !T::allowed().contains(&user.role) {
            tracing::warn!(user_id = %user.id, role = ?user.role, "acesso negado");
            return Err(AppError::Forbidden(T::denial_message().to_string()));
        }

        Ok(RequireRole(PhantomData))
    }
}

pub struct AdminOnly;
impl RoleRequirement for AdminOnly {
    fn allowed() -> &'static [UserRole] {
        &[UserRole::Admin]
    }
    fn denial_message() -> &'static str {
        "Apenas administradores podem realizar esta ação."
    }
}
