// src/middleware/rbac.rs

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// ---
// CONJUNTOS DE PERFIS
// ---
// Cada operação declara explicitamente quem pode executá-la.

pub const CLIENTS_ONLY: &[Role] = &[Role::Client];
pub const COMPANIES_ONLY: &[Role] = &[Role::Company];
pub const ANY_ROLE: &[Role] = &[Role::Client, Role::Company];

/// Falha com `Forbidden` se o perfil do usuário não estiver em `allowed`.
pub fn require_role(user: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        return Ok(());
    }

    tracing::debug!(user_id = %user.id, role = %user.role, "perfil sem acesso à operação");
    Err(AppError::Forbidden(format!(
        "Acesso negado para o perfil '{}'.",
        user.role
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user_with(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Teste".into(),
            email: "teste@email.com".into(),
            password_hash: String::new(),
            role,
            phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn allows_roles_in_the_set() {
        assert!(require_role(&user_with(Role::Client), CLIENTS_ONLY).is_ok());
        assert!(require_role(&user_with(Role::Company), COMPANIES_ONLY).is_ok());
        assert!(require_role(&user_with(Role::Company), ANY_ROLE).is_ok());
    }

    #[test]
    fn forbids_roles_outside_the_set() {
        let err = require_role(&user_with(Role::Company), CLIENTS_ONLY).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = require_role(&user_with(Role::Client), COMPANIES_ONLY).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
