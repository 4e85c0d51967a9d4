// src/models/moving.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_future_date, CEP_RE};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "address_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Origin,
    Destination,
}

// pending -> in_progress, uma única vez, quando um orçamento é aceito.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    InProgress,
}

// --- Linhas do banco ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "01310-100")]
    pub cep: String,
    #[schema(example = "Avenida Paulista")]
    pub street: String,
    #[schema(example = "1578")]
    pub number: String,
    pub complement: Option<String>,
    #[schema(example = "Bela Vista")]
    pub neighborhood: String,
    #[schema(example = "São Paulo")]
    pub city: String,
    #[schema(example = "SP")]
    pub state: String,
    pub kind: AddressKind,
}

// A "solicitação" de mudança
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovingRequest {
    pub id: Uuid,
    pub client_id: Uuid,
    pub origin_address_id: Uuid,
    pub destination_address_id: Uuid,
    #[schema(example = "Apartamento de 2 quartos, sem elevador")]
    pub description: Option<String>,
    pub move_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Solicitação com os dois endereços e o contato do cliente dono
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovingRequestDetail {
    #[serde(flatten)]
    pub request: MovingRequest,
    pub origin: Address,
    pub destination: Address,
    #[schema(example = "Maria da Silva")]
    pub client_name: String,
    pub client_phone: Option<String>,
}

// O que o repositório precisa para inserir a solicitação
#[derive(Debug, Clone)]
pub struct NewMovingRequest {
    pub client_id: Uuid,
    pub origin_address_id: Uuid,
    pub destination_address_id: Uuid,
    pub description: Option<String>,
    pub move_date: DateTime<Utc>,
    pub notes: Option<String>,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    #[validate(regex(path = *CEP_RE, code = "invalid_cep", message = "O CEP deve ter o formato 00000-000."))]
    #[schema(example = "01310-100")]
    pub cep: String,

    #[validate(length(min = 5, max = 255, message = "O logradouro deve ter entre 5 e 255 caracteres."))]
    #[schema(example = "Avenida Paulista")]
    pub street: String,

    #[validate(length(min = 1, max = 10, message = "O número deve ter entre 1 e 10 caracteres."))]
    #[schema(example = "1578")]
    pub number: String,

    #[validate(length(max = 255, message = "O complemento deve ter no máximo 255 caracteres."))]
    pub complement: Option<String>,

    #[validate(length(min = 1, max = 255, message = "O bairro é obrigatório."))]
    #[schema(example = "Bela Vista")]
    pub neighborhood: String,

    #[validate(length(min = 1, max = 255, message = "A cidade é obrigatória."))]
    #[schema(example = "São Paulo")]
    pub city: String,

    #[validate(length(equal = 2, message = "O estado deve ser a sigla de 2 letras."))]
    #[schema(example = "SP")]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovingRequestPayload {
    #[validate(nested)]
    pub origin_address: AddressPayload,

    #[validate(nested)]
    pub destination_address: AddressPayload,

    #[validate(length(max = 1000, message = "A descrição deve ter no máximo 1000 caracteres."))]
    pub description: Option<String>,

    #[validate(custom(function = "validate_future_date"))]
    pub move_date: DateTime<Utc>,

    #[validate(length(max = 500, message = "As observações devem ter no máximo 500 caracteres."))]
    pub notes: Option<String>,
}
