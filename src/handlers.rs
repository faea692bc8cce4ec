pub mod auth;
pub mod dashboard;
pub mod lotes;
pub mod loteamentos;
pub mod users;
