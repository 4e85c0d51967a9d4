// src/services/moving_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::rbac::{require_role, ANY_ROLE, CLIENTS_ONLY},
    models::{
        auth::{Role, User},
        moving::{AddressKind, CreateMovingRequestPayload, MovingRequest, MovingRequestDetail, NewMovingRequest},
    },
    store::MarketplaceStore,
};

#[derive(Clone)]
pub struct MovingService {
    store: Arc<dyn MarketplaceStore>,
}

impl MovingService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Cria a solicitação com seus dois endereços. Ou entram as três linhas,
    /// ou nenhuma.
    pub async fn create_request(
        &self,
        caller: &User,
        payload: &CreateMovingRequestPayload,
    ) -> Result<MovingRequest, AppError> {
        require_role(caller, CLIENTS_ONLY)?;

        // 1. Inicia a transação
        let mut tx = self.store.begin().await?;

        // 2. Endereços de origem e destino
        let origin = tx
            .insert_address(caller.id, &payload.origin_address, AddressKind::Origin)
            .await?;
        let destination = tx
            .insert_address(caller.id, &payload.destination_address, AddressKind::Destination)
            .await?;

        // 3. A solicitação, apontando para os dois
        let request = tx
            .insert_request(&NewMovingRequest {
                client_id: caller.id,
                origin_address_id: origin.id,
                destination_address_id: destination.id,
                description: payload.description.clone(),
                move_date: payload.move_date,
                notes: payload.notes.clone(),
            })
            .await?;

        // 4. Commit
        tx.commit().await?;

        tracing::info!(request_id = %request.id, client_id = %caller.id, "solicitação criada");
        Ok(request)
    }

    /// Cliente vê as próprias solicitações; empresa vê todas as pendentes.
    pub async fn list_requests(&self, caller: &User) -> Result<Vec<MovingRequestDetail>, AppError> {
        require_role(caller, ANY_ROLE)?;

        match caller.role {
            Role::Client => self.store.list_requests_by_client(caller.id).await,
            Role::Company => self.store.list_pending_requests().await,
        }
    }

    pub async fn get_request(&self, caller: &User, request_id: Uuid) -> Result<MovingRequestDetail, AppError> {
        require_role(caller, ANY_ROLE)?;

        let detail = self
            .store
            .find_request_detail(request_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Solicitação não encontrada.".into()))?;

        // Empresas enxergam qualquer solicitação; clientes, só as suas
        if caller.role == Role::Client && detail.request.client_id != caller.id {
            return Err(AppError::Forbidden("Acesso negado.".into()));
        }

        Ok(detail)
    }
}
