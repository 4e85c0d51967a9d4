// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MovingRequestRepository, QuoteRepository, UserRepository},
    models::{
        auth::{NewUser, User},
        moving::{Address, AddressKind, AddressPayload, MovingRequest, MovingRequestDetail, NewMovingRequest, RequestStatus},
        quotes::{LockedQuote, NewQuote, Quote, QuoteStatus, QuoteSummary},
    },
    store::{MarketplaceStore, StoreTransaction},
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    user_repo: UserRepository,
    moving_repo: MovingRequestRepository,
    quote_repo: QuoteRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            user_repo: UserRepository::new(pool.clone()),
            moving_repo: MovingRequestRepository::new(pool.clone()),
            quote_repo: QuoteRepository::new(pool.clone()),
            pool,
        }
    }
}

// O `sqlx::Transaction` faz rollback sozinho quando é dropado sem commit,
// então qualquer `?` no meio do caminho desfaz tudo.
pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
    moving_repo: MovingRequestRepository,
    quote_repo: QuoteRepository,
}

#[async_trait]
impl MarketplaceStore for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction {
            tx,
            moving_repo: self.moving_repo.clone(),
            quote_repo: self.quote_repo.clone(),
        }))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_id(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.user_repo.find_by_email(email).await
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        self.user_repo.create_user(&self.pool, new_user).await
    }

    async fn list_requests_by_client(&self, client_id: Uuid) -> Result<Vec<MovingRequestDetail>, AppError> {
        self.moving_repo.list_by_client(client_id).await
    }

    async fn list_pending_requests(&self) -> Result<Vec<MovingRequestDetail>, AppError> {
        self.moving_repo.list_pending().await
    }

    async fn find_request_detail(&self, request_id: Uuid) -> Result<Option<MovingRequestDetail>, AppError> {
        self.moving_repo.find_detail(request_id).await
    }

    async fn list_quotes_for_client(&self, client_id: Uuid) -> Result<Vec<QuoteSummary>, AppError> {
        self.quote_repo.list_for_client(client_id).await
    }

    async fn list_quotes_for_company(&self, company_id: Uuid) -> Result<Vec<QuoteSummary>, AppError> {
        self.quote_repo.list_for_company(company_id).await
    }
}

#[async_trait]
impl StoreTransaction for PgTransaction {
    async fn insert_address(
        &mut self,
        owner_id: Uuid,
        address: &AddressPayload,
        kind: AddressKind,
    ) -> Result<Address, AppError> {
        self.moving_repo
            .create_address(&mut *self.tx, owner_id, address, kind)
            .await
    }

    async fn insert_request(&mut self, new_request: &NewMovingRequest) -> Result<MovingRequest, AppError> {
        self.moving_repo.create_request(&mut *self.tx, new_request).await
    }

    async fn find_pending_request(&mut self, request_id: Uuid) -> Result<Option<MovingRequest>, AppError> {
        self.moving_repo
            .find_pending_for_share(&mut *self.tx, request_id)
            .await
    }

    async fn quote_exists(&mut self, request_id: Uuid, company_id: Uuid) -> Result<bool, AppError> {
        self.quote_repo
            .exists_for_company(&mut *self.tx, request_id, company_id)
            .await
    }

    async fn insert_quote(&mut self, new_quote: &NewQuote) -> Result<Quote, AppError> {
        self.quote_repo.create_quote(&mut *self.tx, new_quote).await
    }

    async fn lock_quote_for_client(
        &mut self,
        quote_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<LockedQuote>, AppError> {
        // 1. Primeiro a solicitação (sempre na mesma ordem, sem deadlock entre irmãos)
        let parent = self
            .quote_repo
            .lock_parent_request(&mut *self.tx, quote_id, client_id)
            .await?;

        if parent.is_none() {
            return Ok(None);
        }

        // 2. Depois o orçamento, relido com o estado já confirmado
        self.quote_repo.find_for_decision(&mut *self.tx, quote_id).await
    }

    async fn update_quote_status(&mut self, quote_id: Uuid, status: QuoteStatus) -> Result<(), AppError> {
        self.quote_repo
            .update_status(&mut *self.tx, quote_id, status)
            .await
    }

    async fn update_request_status(&mut self, request_id: Uuid, status: RequestStatus) -> Result<(), AppError> {
        self.moving_repo
            .update_status(&mut *self.tx, request_id, status)
            .await
    }

    async fn reject_pending_siblings(&mut self, request_id: Uuid, accepted_quote_id: Uuid) -> Result<u64, AppError> {
        self.quote_repo
            .reject_pending_siblings(&mut *self.tx, request_id, accepted_quote_id)
            .await
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
