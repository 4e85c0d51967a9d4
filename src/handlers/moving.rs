// src/handlers/moving.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{error::AppError, extract::ValidatedJson},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::moving::{CreateMovingRequestPayload, MovingRequest, MovingRequestDetail},
};

// POST /api/requests
#[utoipa::path(
    post,
    path = "/api/requests",
    tag = "Solicitações",
    request_body = CreateMovingRequestPayload,
    responses(
        (status = 201, description = "Solicitação criada", body = MovingRequest),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas clientes podem criar solicitações")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateMovingRequestPayload>,
) -> Result<impl IntoResponse, AppError> {
    let request = app_state.moving_service.create_request(&user, &payload).await?;

    Ok((StatusCode::CREATED, Json(request)))
}

// GET /api/requests
#[utoipa::path(
    get,
    path = "/api/requests",
    tag = "Solicitações",
    responses(
        (status = 200, description = "Cliente: as próprias solicitações. Empresa: as pendentes.", body = Vec<MovingRequestDetail>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<MovingRequestDetail>>, AppError> {
    let requests = app_state.moving_service.list_requests(&user).await?;
    Ok(Json(requests))
}

// GET /api/requests/{id}
#[utoipa::path(
    get,
    path = "/api/requests/{id}",
    tag = "Solicitações",
    params(
        ("id" = Uuid, Path, description = "ID da solicitação")
    ),
    responses(
        (status = 200, description = "Solicitação com endereços", body = MovingRequestDetail),
        (status = 403, description = "Solicitação de outro cliente"),
        (status = 404, description = "Solicitação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(request_id): Path<Uuid>,
) -> Result<Json<MovingRequestDetail>, AppError> {
    let detail = app_state.moving_service.get_request(&user, request_id).await?;
    Ok(Json(detail))
}
