// src/store.rs
//
// A "capacidade de armazenamento" injetada nos serviços.
// Os serviços só conhecem estes dois traits; em produção quem responde é o
// Postgres (`PgStore`), nos testes um armazenamento em memória.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{NewUser, User},
        moving::{Address, AddressKind, AddressPayload, MovingRequest, MovingRequestDetail, NewMovingRequest, RequestStatus},
        quotes::{LockedQuote, NewQuote, Quote, QuoteStatus, QuoteSummary},
    },
};

pub mod postgres;
pub use postgres::PgStore;

#[cfg(test)]
pub mod memory;

/// Operações fora de transação (leituras e cadastro de usuário) e a porta de
/// entrada para as transações.
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    /// Abre uma transação. Se o handle for descartado sem `commit`, tudo o que
    /// foi escrito nele é desfeito.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, AppError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError>;

    async fn list_requests_by_client(&self, client_id: Uuid) -> Result<Vec<MovingRequestDetail>, AppError>;
    async fn list_pending_requests(&self) -> Result<Vec<MovingRequestDetail>, AppError>;
    async fn find_request_detail(&self, request_id: Uuid) -> Result<Option<MovingRequestDetail>, AppError>;

    async fn list_quotes_for_client(&self, client_id: Uuid) -> Result<Vec<QuoteSummary>, AppError>;
    async fn list_quotes_for_company(&self, company_id: Uuid) -> Result<Vec<QuoteSummary>, AppError>;
}

/// Uma unidade atômica de escrita.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn insert_address(
        &mut self,
        owner_id: Uuid,
        address: &AddressPayload,
        kind: AddressKind,
    ) -> Result<Address, AppError>;

    async fn insert_request(&mut self, new_request: &NewMovingRequest) -> Result<MovingRequest, AppError>;

    /// A solicitação, se existir e ainda estiver pendente. Segura a linha até o
    /// fim da transação contra uma aceitação concorrente.
    async fn find_pending_request(&mut self, request_id: Uuid) -> Result<Option<MovingRequest>, AppError>;

    async fn quote_exists(&mut self, request_id: Uuid, company_id: Uuid) -> Result<bool, AppError>;

    /// Falha com `DuplicateQuote` se a empresa já tiver orçamento nesta solicitação.
    async fn insert_quote(&mut self, new_quote: &NewQuote) -> Result<Quote, AppError>;

    /// Trava e relê o orçamento, desde que a solicitação dele pertença a
    /// `client_id`. Decisões sobre a mesma solicitação ficam serializadas a
    /// partir daqui até o fim da transação.
    async fn lock_quote_for_client(
        &mut self,
        quote_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<LockedQuote>, AppError>;

    async fn update_quote_status(&mut self, quote_id: Uuid, status: QuoteStatus) -> Result<(), AppError>;

    async fn update_request_status(&mut self, request_id: Uuid, status: RequestStatus) -> Result<(), AppError>;

    async fn reject_pending_siblings(&mut self, request_id: Uuid, accepted_quote_id: Uuid) -> Result<u64, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}
