// src/handlers/quotes.rs

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        extract::{json_rejection, ValidatedJson},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::quotes::{
        CreateQuotePayload, DecideQuotePayload, DecisionResponse, Quote, QuoteDecision, QuoteSummary,
    },
};

// POST /api/quotes
#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Orçamentos",
    request_body = CreateQuotePayload,
    responses(
        (status = 201, description = "Orçamento enviado", body = Quote),
        (status = 403, description = "Apenas empresas podem enviar orçamentos"),
        (status = 404, description = "Solicitação inexistente ou não mais pendente"),
        (status = 409, description = "A empresa já orçou esta solicitação")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    let quote = app_state.quote_service.create_quote(&user, &payload).await?;

    Ok((StatusCode::CREATED, Json(quote)))
}

// GET /api/quotes
#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Orçamentos",
    responses(
        (status = 200, description = "Cliente: orçamentos recebidos. Empresa: orçamentos enviados.", body = Vec<QuoteSummary>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_quotes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<QuoteSummary>>, AppError> {
    let quotes = app_state.quote_service.list_quotes(&user).await?;
    Ok(Json(quotes))
}

// PATCH /api/quotes/{id}/status
#[utoipa::path(
    patch,
    path = "/api/quotes/{id}/status",
    tag = "Orçamentos",
    params(
        ("id" = Uuid, Path, description = "ID do orçamento")
    ),
    request_body = DecideQuotePayload,
    responses(
        (status = 200, description = "Decisão registrada", body = DecisionResponse),
        (status = 400, description = "Status deve ser 'accepted' ou 'rejected'"),
        (status = 404, description = "Orçamento não encontrado"),
        (status = 409, description = "Orçamento já processado")
    ),
    security(("api_jwt" = []))
)]
pub async fn decide_quote(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(quote_id): Path<Uuid>,
    payload: Result<Json<DecideQuotePayload>, JsonRejection>,
) -> Result<Json<DecisionResponse>, AppError> {
    // Um status fora do enum chega aqui como rejeição do extrator
    let Json(payload) = payload.map_err(|rejection| json_rejection("status", rejection))?;

    let status = app_state
        .quote_service
        .decide_quote(&user, quote_id, payload.status)
        .await?;

    let message = match payload.status {
        QuoteDecision::Accepted => "Orçamento aceito com sucesso",
        QuoteDecision::Rejected => "Orçamento recusado com sucesso",
    };

    Ok(Json(DecisionResponse { message: message.to_string(), status }))
}
