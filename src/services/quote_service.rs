// src/services/quote_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::rbac::{require_role, ANY_ROLE, CLIENTS_ONLY, COMPANIES_ONLY},
    models::{
        auth::{Role, User},
        moving::RequestStatus,
        quotes::{CreateQuotePayload, NewQuote, Quote, QuoteDecision, QuoteStatus, QuoteSummary},
    },
    store::MarketplaceStore,
};

#[derive(Clone)]
pub struct QuoteService {
    store: Arc<dyn MarketplaceStore>,
}

impl QuoteService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Envia um orçamento para uma solicitação pendente.
    /// Uma empresa só pode orçar cada solicitação uma vez.
    pub async fn create_quote(&self, caller: &User, payload: &CreateQuotePayload) -> Result<Quote, AppError> {
        require_role(caller, COMPANIES_ONLY)?;

        let mut tx = self.store.begin().await?;

        // 1. A solicitação precisa existir e continuar pendente até o commit
        let request = tx.find_pending_request(payload.request_id).await?.ok_or_else(|| {
            AppError::ResourceNotFound("Solicitação não encontrada ou não está mais disponível.".into())
        })?;

        // 2. Um orçamento por empresa por solicitação
        if tx.quote_exists(request.id, caller.id).await? {
            return Err(AppError::DuplicateQuote);
        }

        // 3. Insere (a UNIQUE ainda cobre duas inserções simultâneas)
        let quote = tx
            .insert_quote(&NewQuote {
                request_id: request.id,
                company_id: caller.id,
                value: payload.value,
                service_description: payload.service_description.clone(),
                deadline_days: payload.deadline_days,
                notes: payload.notes.clone(),
            })
            .await?;

        tx.commit().await?;

        tracing::info!(quote_id = %quote.id, request_id = %request.id, company_id = %caller.id, "orçamento enviado");
        Ok(quote)
    }

    /// Cliente: orçamentos recebidos em suas solicitações. Empresa: os que enviou.
    pub async fn list_quotes(&self, caller: &User) -> Result<Vec<QuoteSummary>, AppError> {
        require_role(caller, ANY_ROLE)?;

        match caller.role {
            Role::Client => self.store.list_quotes_for_client(caller.id).await,
            Role::Company => self.store.list_quotes_for_company(caller.id).await,
        }
    }

    /// Aceita ou recusa um orçamento pendente.
    ///
    /// Aceitar move a solicitação para `in_progress` e recusa todos os outros
    /// orçamentos pendentes dela, tudo na mesma transação. Duas decisões
    /// simultâneas sobre a mesma solicitação são serializadas pelo lock; a
    /// segunda encontra o estado já alterado e recebe `QuoteAlreadyProcessed`.
    pub async fn decide_quote(
        &self,
        caller: &User,
        quote_id: Uuid,
        decision: QuoteDecision,
    ) -> Result<QuoteStatus, AppError> {
        require_role(caller, CLIENTS_ONLY)?;

        // 1. Inicia a transação
        let mut tx = self.store.begin().await?;

        // 2. Trava solicitação e orçamento e relê o estado atual
        let locked = tx
            .lock_quote_for_client(quote_id, caller.id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Orçamento não encontrado.".into()))?;

        // 3. Só decide sobre orçamento pendente de solicitação pendente
        if locked.quote.status != QuoteStatus::Pending || locked.request_status != RequestStatus::Pending {
            return Err(AppError::QuoteAlreadyProcessed);
        }

        // 4. Aplica a decisão
        let new_status = decision.target_status();
        tx.update_quote_status(quote_id, new_status).await?;

        let mut rejected = 0;
        if decision == QuoteDecision::Accepted {
            tx.update_request_status(locked.quote.request_id, RequestStatus::InProgress)
                .await?;
            rejected = tx
                .reject_pending_siblings(locked.quote.request_id, quote_id)
                .await?;
        }

        // 5. Commit
        tx.commit().await?;

        tracing::info!(
            quote_id = %quote_id,
            request_id = %locked.quote.request_id,
            status = ?new_status,
            siblings_rejected = rejected,
            "decisão de orçamento registrada"
        );
        Ok(new_status)
    }
}
