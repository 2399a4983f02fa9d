// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Pedidos ---
        handlers::pedidos::list_pedidos,
        handlers::pedidos::list_pedidos_paginado,
        handlers::pedidos::get_pedido,
        handlers::pedidos::create_pedido,
        handlers::pedidos::update_pedido,
        handlers::pedidos::update_status,

        // --- Remaneio ---
        handlers::pedidos::reorder_remaneio,

        // --- Trocas ---
        handlers::pedidos::list_trocas_do_pedido,
        handlers::trocas::create_troca,
        handlers::trocas::get_troca,
        handlers::trocas::delete_troca,
    ),
    components(
        schemas(
            // --- Pedidos ---
            models::pedido::StatusPedido,
            models::pedido::Pedido,
            models::pedido::ItemPedido,
            models::pedido::PedidoDetalhe,
            models::pedido::ItemEntrada,
            models::pedido::PaginaPedidos,

            // --- Trocas ---
            models::troca::Troca,
            models::troca::TrocaDetalhe,

            // --- Payloads ---
            handlers::pedidos::CriarPedidoPayload,
            handlers::pedidos::AtualizarPedidoPayload,
            handlers::pedidos::AlterarStatusPayload,
            handlers::pedidos::RemaneioPayload,
            handlers::pedidos::RemaneioResposta,
            handlers::trocas::CriarTrocaPayload,
        )
    ),
    tags(
        (name = "Pedidos", description = "Ciclo de vida dos pedidos e seus itens"),
        (name = "Remaneio", description = "Sequência de entrega dos pedidos em CONFERIR"),
        (name = "Trocas", description = "Trocas pós-venda vinculadas aos pedidos")
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
