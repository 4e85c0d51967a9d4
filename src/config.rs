// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::{Context, anyhow};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    services::{AuthService, MovingService, QuoteService},
    store::MarketplaceStore,
};

// Configuração lida das variáveis de ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub token_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separado do `from_env` para ser testável sem mexer no ambiente do processo
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{} deve ser definida", key));

        let ttl_days: i64 = parse_or(&lookup, "TOKEN_TTL_DAYS", 7)?;
        let token_ttl = chrono::Duration::try_days(ttl_days)
            .filter(|ttl| *ttl > chrono::Duration::zero())
            .ok_or_else(|| anyhow!("TOKEN_TTL_DAYS inválida ('{}'): deve ser um número positivo de dias", ttl_days))?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            port: parse_or(&lookup, "PORT", 3000)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            token_ttl,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub async fn connect_pool(&self) -> anyhow::Result<PgPool> {
        let db_pool = PgPoolOptions::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(db_pool)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} inválida ('{}'): {}", key, raw, e)),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub moving_service: MovingService,
    pub quote_service: QuoteService,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn from_store(config: &Config, store: Arc<dyn MarketplaceStore>) -> Self {
        Self {
            auth_service: AuthService::new(
                store.clone(),
                config.jwt_secret.clone(),
                config.token_ttl,
                config.bcrypt_cost,
            ),
            moving_service: MovingService::new(store.clone()),
            quote_service: QuoteService::new(store),
        }
    }
}
