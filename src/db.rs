pub mod fila_repo;
pub use fila_repo::FilaRepository;
pub mod lote_repo;
pub use lote_repo::LoteRepository;
pub mod loteamento_repo;
pub use loteamento_repo::LoteamentoRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
