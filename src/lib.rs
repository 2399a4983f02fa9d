// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

/// Monta o router completo. Leituras são públicas; escritas exigem Bearer.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de escrita (protegidas pelo middleware)
    let escrita = Router::new()
        .route("/pedidos", post(handlers::pedidos::create_pedido))
        .route("/pedidos/{id}", put(handlers::pedidos::update_pedido))
        .route("/pedidos/{id}/status", patch(handlers::pedidos::update_status))
        .route("/pedidos/remaneio/ordem", patch(handlers::pedidos::reorder_remaneio))
        .route("/trocas", post(handlers::trocas::create_troca))
        .route("/trocas/{id}", delete(handlers::trocas::delete_troca))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let leitura = Router::new()
        .route("/pedidos", get(handlers::pedidos::list_pedidos))
        .route("/pedidos/paginado", get(handlers::pedidos::list_pedidos_paginado))
        .route("/pedidos/{id}", get(handlers::pedidos::get_pedido))
        .route("/pedidos/{id}/trocas", get(handlers::pedidos::list_trocas_do_pedido))
        .route("/trocas/{id}", get(handlers::trocas::get_troca));

    // Combina tudo no router principal
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(docs::ApiDoc::openapi()) }))
        .merge(leitura)
        .merge(escrita)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
