pub mod pedido_repo;
pub use pedido_repo::PedidoRepository;
pub mod troca_repo;
pub use troca_repo::TrocaRepository;
pub mod cadastro_repo;
pub use cadastro_repo::CadastroRepository;
