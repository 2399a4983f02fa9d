pub mod pedido_service;
pub use pedido_service::PedidoService;
pub mod remaneio_service;
pub use remaneio_service::RemaneioService;
pub mod troca_service;
pub use troca_service::TrocaService;
pub mod auth;
pub use auth::AuthService;
