pub mod auth;
pub mod moving;
pub mod quotes;
