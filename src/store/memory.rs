// src/store/memory.rs
//
// Armazenamento em memória para os testes.
// Cada transação segura o estado inteiro atrás de um `tokio::sync::Mutex` e
// escreve numa cópia; o commit troca a cópia pelo original. Um handle
// descartado sem commit simplesmente perde a cópia. Dá para forçar uma falha
// numa escrita específica e conferir que nada parcial sobrevive.

use std::sync::{Arc, Mutex as StdMutex};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{NewUser, User},
        moving::{Address, AddressKind, AddressPayload, MovingRequest, MovingRequestDetail, NewMovingRequest, RequestStatus},
        quotes::{LockedQuote, NewQuote, Quote, QuoteStatus, QuoteSummary},
    },
    store::{MarketplaceStore, StoreTransaction},
};

/// Escritas que podem ser forçadas a falhar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    InsertAddress,
    InsertRequest,
    InsertQuote,
    UpdateQuoteStatus,
    UpdateRequestStatus,
    RejectSiblings,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: Vec<User>,
    addresses: Vec<Address>,
    requests: Vec<MovingRequest>,
    quotes: Vec<Quote>,
}

impl MemoryState {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn address(&self, id: Uuid) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }

    fn request(&self, id: Uuid) -> Option<&MovingRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    fn detail(&self, request: &MovingRequest) -> Option<MovingRequestDetail> {
        let client = self.user(request.client_id)?;
        Some(MovingRequestDetail {
            request: request.clone(),
            origin: self.address(request.origin_address_id)?.clone(),
            destination: self.address(request.destination_address_id)?.clone(),
            client_name: client.name.clone(),
            client_phone: client.phone.clone(),
        })
    }

    // Mais recentes primeiro; em empate de horário, o último inserido vem antes.
    fn newest_first<T>(
        items: impl DoubleEndedIterator<Item = T>,
        created_at: impl Fn(&T) -> DateTime<Utc>,
    ) -> Vec<T> {
        let mut items: Vec<T> = items.rev().collect();
        items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
        items
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_point: Arc<StdMutex<Option<FailPoint>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A próxima transação que chegar em `point` falha com erro interno.
    pub fn fail_on(&self, point: FailPoint) {
        *self.fail_point.lock().unwrap() = Some(point);
    }

    pub async fn quote(&self, id: Uuid) -> Option<Quote> {
        self.state.lock().await.quotes.iter().find(|q| q.id == id).cloned()
    }

    pub async fn request(&self, id: Uuid) -> Option<MovingRequest> {
        self.state.lock().await.request(id).cloned()
    }

    pub async fn address_count(&self) -> usize {
        self.state.lock().await.addresses.len()
    }

    pub async fn request_count(&self) -> usize {
        self.state.lock().await.requests.len()
    }

    pub async fn quotes_of_request(&self, request_id: Uuid) -> Vec<Quote> {
        self.state
            .lock()
            .await
            .quotes
            .iter()
            .filter(|q| q.request_id == request_id)
            .cloned()
            .collect()
    }
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    fail_point: Arc<StdMutex<Option<FailPoint>>>,
}

impl MemoryTransaction {
    fn check(&self, point: FailPoint) -> Result<(), AppError> {
        let mut armed = self.fail_point.lock().unwrap();
        if *armed == Some(point) {
            *armed = None;
            return Err(AppError::InternalServerError(anyhow!("falha injetada em {:?}", point)));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketplaceStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, AppError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = (*guard).clone();
        Ok(Box::new(MemoryTransaction {
            guard,
            staged,
            fail_point: Arc::clone(&self.fail_point),
        }))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.state.lock().await.user(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role,
            phone: new_user.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn list_requests_by_client(&self, client_id: Uuid) -> Result<Vec<MovingRequestDetail>, AppError> {
        let state = self.state.lock().await;
        let owned = state.requests.iter().filter(|r| r.client_id == client_id).cloned();
        Ok(MemoryState::newest_first(owned, |r: &MovingRequest| r.created_at)
            .iter()
            .filter_map(|r| state.detail(r))
            .collect())
    }

    async fn list_pending_requests(&self) -> Result<Vec<MovingRequestDetail>, AppError> {
        let state = self.state.lock().await;
        let pending = state
            .requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .cloned();
        Ok(MemoryState::newest_first(pending, |r: &MovingRequest| r.created_at)
            .iter()
            .filter_map(|r| state.detail(r))
            .collect())
    }

    async fn find_request_detail(&self, request_id: Uuid) -> Result<Option<MovingRequestDetail>, AppError> {
        let state = self.state.lock().await;
        Ok(state.request(request_id).and_then(|r| state.detail(r)))
    }

    async fn list_quotes_for_client(&self, client_id: Uuid) -> Result<Vec<QuoteSummary>, AppError> {
        let state = self.state.lock().await;
        let mine = state.quotes.iter().filter(|q| {
            state
                .request(q.request_id)
                .is_some_and(|r| r.client_id == client_id)
        });

        Ok(MemoryState::newest_first(mine.cloned(), |q: &Quote| q.created_at)
            .into_iter()
            .filter_map(|quote| {
                let request = state.request(quote.request_id)?;
                let company = state.user(quote.company_id)?;
                Some(QuoteSummary {
                    request_description: request.description.clone(),
                    counterpart_name: company.name.clone(),
                    counterpart_phone: company.phone.clone(),
                    quote,
                })
            })
            .collect())
    }

    async fn list_quotes_for_company(&self, company_id: Uuid) -> Result<Vec<QuoteSummary>, AppError> {
        let state = self.state.lock().await;
        let sent = state.quotes.iter().filter(|q| q.company_id == company_id);

        Ok(MemoryState::newest_first(sent.cloned(), |q: &Quote| q.created_at)
            .into_iter()
            .filter_map(|quote| {
                let request = state.request(quote.request_id)?;
                let client = state.user(request.client_id)?;
                Some(QuoteSummary {
                    request_description: request.description.clone(),
                    counterpart_name: client.name.clone(),
                    counterpart_phone: client.phone.clone(),
                    quote,
                })
            })
            .collect())
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn insert_address(
        &mut self,
        owner_id: Uuid,
        address: &AddressPayload,
        kind: AddressKind,
    ) -> Result<Address, AppError> {
        self.check(FailPoint::InsertAddress)?;
        let created = Address {
            id: Uuid::new_v4(),
            user_id: owner_id,
            cep: address.cep.clone(),
            street: address.street.clone(),
            number: address.number.clone(),
            complement: address.complement.clone(),
            neighborhood: address.neighborhood.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            kind,
        };
        self.staged.addresses.push(created.clone());
        Ok(created)
    }

    async fn insert_request(&mut self, new_request: &NewMovingRequest) -> Result<MovingRequest, AppError> {
        self.check(FailPoint::InsertRequest)?;
        let now = Utc::now();
        let request = MovingRequest {
            id: Uuid::new_v4(),
            client_id: new_request.client_id,
            origin_address_id: new_request.origin_address_id,
            destination_address_id: new_request.destination_address_id,
            description: new_request.description.clone(),
            move_date: new_request.move_date,
            notes: new_request.notes.clone(),
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.staged.requests.push(request.clone());
        Ok(request)
    }

    async fn find_pending_request(&mut self, request_id: Uuid) -> Result<Option<MovingRequest>, AppError> {
        Ok(self
            .staged
            .request(request_id)
            .filter(|r| r.status == RequestStatus::Pending)
            .cloned())
    }

    async fn quote_exists(&mut self, request_id: Uuid, company_id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .staged
            .quotes
            .iter()
            .any(|q| q.request_id == request_id && q.company_id == company_id))
    }

    async fn insert_quote(&mut self, new_quote: &NewQuote) -> Result<Quote, AppError> {
        self.check(FailPoint::InsertQuote)?;
        if self.quote_exists(new_quote.request_id, new_quote.company_id).await? {
            return Err(AppError::DuplicateQuote);
        }

        let now = Utc::now();
        let quote = Quote {
            id: Uuid::new_v4(),
            request_id: new_quote.request_id,
            company_id: new_quote.company_id,
            value: new_quote.value,
            service_description: new_quote.service_description.clone(),
            deadline_days: new_quote.deadline_days,
            notes: new_quote.notes.clone(),
            status: QuoteStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.staged.quotes.push(quote.clone());
        Ok(quote)
    }

    async fn lock_quote_for_client(
        &mut self,
        quote_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<LockedQuote>, AppError> {
        let Some(quote) = self.staged.quotes.iter().find(|q| q.id == quote_id) else {
            return Ok(None);
        };
        let Some(request) = self.staged.request(quote.request_id) else {
            return Ok(None);
        };
        if request.client_id != client_id {
            return Ok(None);
        }

        Ok(Some(LockedQuote {
            quote: quote.clone(),
            request_status: request.status,
        }))
    }

    async fn update_quote_status(&mut self, quote_id: Uuid, status: QuoteStatus) -> Result<(), AppError> {
        self.check(FailPoint::UpdateQuoteStatus)?;
        if let Some(quote) = self.staged.quotes.iter_mut().find(|q| q.id == quote_id) {
            quote.status = status;
            quote.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_request_status(&mut self, request_id: Uuid, status: RequestStatus) -> Result<(), AppError> {
        self.check(FailPoint::UpdateRequestStatus)?;
        if let Some(request) = self.staged.requests.iter_mut().find(|r| r.id == request_id) {
            request.status = status;
            request.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn reject_pending_siblings(&mut self, request_id: Uuid, accepted_quote_id: Uuid) -> Result<u64, AppError> {
        self.check(FailPoint::RejectSiblings)?;
        let now = Utc::now();
        let mut rejected = 0;
        for quote in self.staged.quotes.iter_mut().filter(|q| {
            q.request_id == request_id && q.id != accepted_quote_id && q.status == QuoteStatus::Pending
        }) {
            quote.status = QuoteStatus::Rejected;
            quote.updated_at = now;
            rejected += 1;
        }
        Ok(rejected)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryTransaction {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }
}
