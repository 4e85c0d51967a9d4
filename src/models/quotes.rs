// src/models/quotes.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_positive_value;
use crate::models::moving::RequestStatus;

// --- Enums ---

// pending -> accepted | rejected. Os dois últimos são terminais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quote_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Accepted,
    Rejected,
}

// A decisão do cliente. Só aceita os dois estados terminais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuoteDecision {
    Accepted,
    Rejected,
}

impl QuoteDecision {
    pub fn target_status(self) -> QuoteStatus {
        match self {
            QuoteDecision::Accepted => QuoteStatus::Accepted,
            QuoteDecision::Rejected => QuoteStatus::Rejected,
        }
    }
}

// --- Linhas do banco ---

// O "orçamento" enviado por uma empresa
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub request_id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "1500.00")]
    pub value: Decimal,
    #[schema(example = "Transporte com caminhão baú e 3 ajudantes")]
    pub service_description: String,
    #[schema(example = 5)]
    pub deadline_days: i32,
    pub notes: Option<String>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Orçamento com os dados da outra parte:
// para o cliente, a empresa; para a empresa, o cliente.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub quote: Quote,
    pub request_description: Option<String>,
    #[schema(example = "Mudanças Rápidas LTDA")]
    pub counterpart_name: String,
    pub counterpart_phone: Option<String>,
}

// Orçamento relido dentro da transação de decisão, já com o estado da solicitação
#[derive(Debug, Clone, FromRow)]
pub struct LockedQuote {
    #[sqlx(flatten)]
    pub quote: Quote,
    pub request_status: RequestStatus,
}

#[derive(Debug, Clone)]
pub struct NewQuote {
    pub request_id: Uuid,
    pub company_id: Uuid,
    pub value: Decimal,
    pub service_description: String,
    pub deadline_days: i32,
    pub notes: Option<String>,
}

// --- Payloads ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotePayload {
    pub request_id: Uuid,

    #[validate(custom(function = "validate_positive_value"))]
    #[schema(example = "1500.00")]
    pub value: Decimal,

    #[validate(length(min = 1, max = 1000, message = "A descrição do serviço deve ter entre 1 e 1000 caracteres."))]
    pub service_description: String,

    #[validate(range(min = 1, message = "O prazo deve ser de pelo menos 1 dia."))]
    #[schema(example = 5)]
    pub deadline_days: i32,

    #[validate(length(max = 500, message = "As observações devem ter no máximo 500 caracteres."))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DecideQuotePayload {
    pub status: QuoteDecision,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DecisionResponse {
    #[schema(example = "Orçamento aceito com sucesso")]
    pub message: String,
    pub status: QuoteStatus,
}
