// src/handlers/pedidos.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{deserialize_some, AppJson, AppPath},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        pedido::{ConsultaPaginada, ItemEntrada, PaginaPedidos, Pedido, PedidoDetalhe},
        troca::TrocaDetalhe,
    },
};

// =============================================================================
//  1. LEITURA
// =============================================================================

// GET /pedidos
#[utoipa::path(
    get,
    path = "/pedidos",
    tag = "Pedidos",
    responses(
        (status = 200, description = "Todos os pedidos com seus itens (fila do remaneio primeiro)", body = Vec<PedidoDetalhe>)
    )
)]
pub async fn list_pedidos(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let pedidos = app_state.pedido_service.list().await?;
    Ok(Json(pedidos))
}

// GET /pedidos/paginado
#[utoipa::path(
    get,
    path = "/pedidos/paginado",
    tag = "Pedidos",
    params(ConsultaPaginada),
    responses(
        (status = 200, description = "Página de pedidos", body = PaginaPedidos),
        (status = 400, description = "Filtro inválido (status, data, pagina ou limite)")
    )
)]
pub async fn list_pedidos_paginado(
    State(app_state): State<AppState>,
    Query(consulta): Query<ConsultaPaginada>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = app_state.pedido_service.list_page(&consulta).await?;
    Ok(Json(pagina))
}

// GET /pedidos/{id}
#[utoipa::path(
    get,
    path = "/pedidos/{id}",
    tag = "Pedidos",
    params(("id" = i32, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido com itens", body = PedidoDetalhe),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn get_pedido(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let pedido = app_state.pedido_service.get(id).await?;
    Ok(Json(pedido))
}

// GET /pedidos/{id}/trocas
#[utoipa::path(
    get,
    path = "/pedidos/{id}/trocas",
    tag = "Trocas",
    params(("id" = i32, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Trocas do pedido, mais recentes primeiro", body = Vec<TrocaDetalhe>),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn list_trocas_do_pedido(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let trocas = app_state.troca_service.list_for_pedido(id).await?;
    Ok(Json(trocas))
}

// =============================================================================
//  2. ESCRITA
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CriarPedidoPayload {
    /// Gerada a partir do cliente quando ausente
    #[validate(length(max = 60, message = "chave_pedido muito longa"))]
    #[schema(example = "C001-lt7x9k2a")]
    pub chave_pedido: Option<String>,

    #[validate(range(min = 1, message = "cliente_id inválido"))]
    #[schema(example = 1)]
    pub cliente_id: i32,

    pub rota_id: Option<i32>,

    #[schema(example = "2024-03-01")]
    pub data: String,

    /// EM_ESPERA quando ausente
    #[schema(example = "EM_ESPERA")]
    pub status: Option<String>,

    #[validate(length(min = 1, message = "O pedido precisa de ao menos um item."), nested)]
    pub itens: Vec<ItemEntrada>,
}

// POST /pedidos
#[utoipa::path(
    post,
    path = "/pedidos",
    tag = "Pedidos",
    request_body = CriarPedidoPayload,
    responses(
        (status = 201, description = "Pedido criado com itens e total calculado", body = PedidoDetalhe),
        (status = 400, description = "Campos ausentes ou inválidos"),
        (status = 404, description = "Cliente, rota ou produto não encontrado"),
        (status = 409, description = "chave_pedido já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_pedido(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(payload): AppJson<CriarPedidoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let pedido = app_state
        .pedido_service
        .create(
            payload.chave_pedido.as_deref(),
            payload.cliente_id,
            payload.rota_id,
            &payload.data,
            payload.status.as_deref(),
            &payload.itens,
            user.0.usuario_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(pedido)))
}

/// Só os campos presentes são alterados. `"rota_id": null` remove a rota.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AtualizarPedidoPayload {
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>, example = 2)]
    pub rota_id: Option<Option<i32>>,

    #[schema(example = "2024-03-02")]
    pub data: Option<String>,

    #[schema(example = "CONFERIR")]
    pub status: Option<String>,

    /// Substitui todos os itens do pedido
    #[validate(nested)]
    pub itens: Option<Vec<ItemEntrada>>,
}

// PUT /pedidos/{id}
#[utoipa::path(
    put,
    path = "/pedidos/{id}",
    tag = "Pedidos",
    params(("id" = i32, Path, description = "ID do pedido")),
    request_body = AtualizarPedidoPayload,
    responses(
        (status = 200, description = "Pedido atualizado com os itens atuais", body = PedidoDetalhe),
        (status = 400, description = "Campos inválidos"),
        (status = 404, description = "Pedido, rota ou produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_pedido(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<AtualizarPedidoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let pedido = app_state
        .pedido_service
        .replace_full(
            id,
            payload.rota_id,
            payload.data.as_deref(),
            payload.status.as_deref(),
            payload.itens.as_deref(),
            user.0.usuario_id,
        )
        .await?;

    Ok(Json(pedido))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AlterarStatusPayload {
    #[schema(example = "EFETIVADO")]
    pub status: String,

    #[schema(value_type = Option<String>, example = "28.50")]
    pub valor_efetivado: Option<Decimal>,

    #[schema(example = "2024-03-05")]
    pub data: Option<String>,
}

// PATCH /pedidos/{id}/status
#[utoipa::path(
    patch,
    path = "/pedidos/{id}/status",
    tag = "Pedidos",
    params(("id" = i32, Path, description = "ID do pedido")),
    request_body = AlterarStatusPayload,
    responses(
        (status = 200, description = "Pedido com o novo status (sem itens)", body = Pedido),
        (status = 400, description = "Status ou data inválidos"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<AlterarStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let pedido = app_state
        .pedido_service
        .transition_status(
            id,
            &payload.status,
            payload.valor_efetivado,
            payload.data.as_deref(),
            user.0.usuario_id,
        )
        .await?;

    Ok(Json(pedido))
}

// =============================================================================
//  3. REMANEIO
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemaneioPayload {
    /// Pedidos em CONFERIR, na ordem desejada
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemaneioResposta {
    pub ok: bool,
    /// Quantidade de pedidos reposicionados
    pub total: u64,
}

// PATCH /pedidos/remaneio/ordem
#[utoipa::path(
    patch,
    path = "/pedidos/remaneio/ordem",
    tag = "Remaneio",
    request_body = RemaneioPayload,
    responses(
        (status = 200, description = "Fila reordenada", body = RemaneioResposta),
        (status = 400, description = "Lista vazia, ids inválidos ou fora de CONFERIR (campo `invalidos`)")
    ),
    security(("api_jwt" = []))
)]
pub async fn reorder_remaneio(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(payload): AppJson<RemaneioPayload>,
) -> Result<impl IntoResponse, AppError> {
    let total = app_state
        .remaneio_service
        .reorder(&payload.ids, user.0.usuario_id)
        .await?;

    Ok(Json(RemaneioResposta { ok: true, total }))
}
