// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Mudanças API", description = "Marketplace de serviços de mudança"),
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Solicitações ---
        handlers::moving::create_request,
        handlers::moving::list_requests,
        handlers::moving::get_request,

        // --- Orçamentos ---
        handlers::quotes::create_quote,
        handlers::quotes::list_quotes,
        handlers::quotes::decide_quote,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Solicitações ---
            models::moving::AddressKind,
            models::moving::RequestStatus,
            models::moving::Address,
            models::moving::MovingRequest,
            models::moving::MovingRequestDetail,
            models::moving::AddressPayload,
            models::moving::CreateMovingRequestPayload,

            // --- Orçamentos ---
            models::quotes::QuoteStatus,
            models::quotes::QuoteDecision,
            models::quotes::Quote,
            models::quotes::QuoteSummary,
            models::quotes::CreateQuotePayload,
            models::quotes::DecideQuotePayload,
            models::quotes::DecisionResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Solicitações", description = "Pedidos de mudança dos clientes"),
        (name = "Orçamentos", description = "Propostas das empresas e decisão do cliente")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
