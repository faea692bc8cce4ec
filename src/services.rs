pub mod auth;
pub mod dashboard_service;
pub mod email;
pub mod lote_service;
pub mod loteamento_service;
pub mod permissions;
pub mod session;
pub mod user_service;
