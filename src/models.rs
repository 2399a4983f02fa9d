pub mod auth;
pub mod pedido;
pub mod troca;
