// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Claims, NewUser, RegisterUserPayload, User},
    store::MarketplaceStore,
};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn MarketplaceStore>,
    jwt_secret: String,
    token_ttl: chrono::Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn MarketplaceStore>,
        jwt_secret: String,
        token_ttl: chrono::Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self { store, jwt_secret, token_ttl, bcrypt_cost }
    }

    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<(User, String), AppError> {
        if self.store.find_user_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        // 1. Hashing fora do runtime assíncrono
        let password_clone = payload.password.clone();
        let cost = self.bcrypt_cost;
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 2. Cria o usuário (a UNIQUE do e-mail ainda protege contra corrida)
        let new_user = self
            .store
            .create_user(&NewUser {
                name: payload.name.clone(),
                email: payload.email.clone(),
                password_hash: hashed_password,
                role: payload.role,
                phone: payload.phone.clone(),
            })
            .await?;

        tracing::info!(user_id = %new_user.id, role = %new_user.role, "usuário registrado");

        // 3. Gera o token
        let token = self.create_token(new_user.id)?;
        Ok((new_user, token))
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(user.id)?;
        Ok((user, token))
    }

    // Token expirado, assinatura errada ou usuário que não existe mais: tudo vira InvalidToken
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!("token rejeitado: {}", e);
            AppError::InvalidToken
        })?;

        self.store
            .find_user_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| anyhow::anyhow!("Validade do token fora do intervalo de datas"))?;

        // Antes de 1970 vira 0: o token já nasce expirado
        let claims = Claims {
            sub: user_id,
            exp: u64::try_from(expires_at.timestamp()).unwrap_or(0),
            iat: u64::try_from(now.timestamp()).unwrap_or(0),
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
    use crate::models::auth::Role;
    use crate::store::memory::InMemoryStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryStore::new()),
            "segredo-de-teste".into(),
            chrono::Duration::days(7),
            4,
        )
    }

    fn payload(email: &str) -> RegisterUserPayload {
        RegisterUserPayload {
            name: "Carlos Souza".into(),
            email: email.into(),
            password: "senha123".into(),
            role: Role::Client,
            phone: Some("11988887777".into()),
        }
    }

    #[tokio::test]
    async fn register_then_login_and_validate() {
        let auth = service();
        let (user, token) = auth.register_user(&payload("carlos@email.com")).await.unwrap();
        assert_eq!(user.role, Role::Client);
        assert_ne!(user.password_hash, "senha123");

        let resolved = auth.validate_token(&token).await.unwrap();
        assert_eq!(resolved.id, user.id);

        let (logged, _) = auth.login_user("carlos@email.com", "senha123").await.unwrap();
        assert_eq!(logged.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let auth = service();
        auth.register_user(&payload("dup@email.com")).await.unwrap();
        let err = auth.register_user(&payload("dup@email.com")).await.unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyExists));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_invalid_credentials() {
        let auth = service();
        auth.register_user(&payload("ana@email.com")).await.unwrap();

        let err = auth.login_user("ana@email.com", "errada").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = auth.login_user("ninguem@email.com", "senha123").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn garbage_and_foreign_tokens_are_invalid() {
        let auth = service();
        assert!(matches!(
            auth.validate_token("nao.e.jwt").await.unwrap_err(),
            AppError::InvalidToken
        ));

        // Assinado com outro segredo
        let other = AuthService::new(
            Arc::new(InMemoryStore::new()),
            "outro-segredo".into(),
            chrono::Duration::days(7),
            4,
        );
        let (_, token) = other.register_user(&payload("x@email.com")).await.unwrap();
        assert!(matches!(
            auth.validate_token(&token).await.unwrap_err(),
            AppError::InvalidToken
        ));
    }

    #[tokio::test]
    async fn token_for_missing_user_is_invalid() {
        let auth = service();
        let token = auth.create_token(Uuid::new_v4()).unwrap();
        assert!(matches!(
            auth.validate_token(&token).await.unwrap_err(),
            AppError::InvalidToken
        ));
    }

    #[tokio::test]
    async fn expiry_before_epoch_does_not_wrap_around() {
        let auth = AuthService::new(
            Arc::new(InMemoryStore::new()),
            "segredo-de-teste".into(),
            chrono::Duration::days(-30_000),
            4,
        );
        let (user, token) = auth.register_user(&payload("antigo@email.com")).await.unwrap();
        assert!(matches!(
            auth.validate_token(&token).await.unwrap_err(),
            AppError::InvalidToken
        ));

        // Validade que estoura o intervalo de datas é erro interno, não panic
        let auth = AuthService::new(
            Arc::new(InMemoryStore::new()),
            "segredo-de-teste".into(),
            chrono::Duration::MAX,
            4,
        );
        let err = auth.create_token(user.id).unwrap_err();
        assert!(matches!(err, AppError::InternalServerError(_)));
    }

    #[tokio::test]
    async fn expired_token_is_invalid() {
        let auth = AuthService::new(
            Arc::new(InMemoryStore::new()),
            "segredo-de-teste".into(),
            chrono::Duration::days(-1),
            4,
        );
        let (_, token) = auth.register_user(&payload("velho@email.com")).await.unwrap();
        assert!(matches!(
            auth.validate_token(&token).await.unwrap_err(),
            AppError::InvalidToken
        ));
    }
}
