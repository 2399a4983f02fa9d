pub mod pedidos;
pub mod trocas;
