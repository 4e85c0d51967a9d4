pub mod auth;
pub use auth::AuthService;
pub mod moving_service;
pub use moving_service::MovingService;
pub mod quote_service;
pub use quote_service::QuoteService;
