// src/handlers/trocas.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath},
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::troca::Troca,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CriarTrocaPayload {
    #[validate(range(min = 1, message = "pedido_id inválido"))]
    #[schema(example = 42)]
    pub pedido_id: i32,

    /// Item do pedido trocado (opcional, precisa ser do mesmo pedido)
    pub item_pedido_id: Option<i32>,

    #[validate(range(min = 1, message = "produto_id inválido"))]
    #[schema(example = 7)]
    pub produto_id: i32,

    #[schema(value_type = String, example = "1")]
    pub quantidade: Decimal,

    #[schema(value_type = Option<String>, example = "10.00")]
    pub valor_troca: Option<Decimal>,

    #[validate(length(max = 500, message = "motivo muito longo"))]
    #[schema(example = "Produto avariado na entrega")]
    pub motivo: Option<String>,
}

// POST /trocas
#[utoipa::path(
    post,
    path = "/trocas",
    tag = "Trocas",
    request_body = CriarTrocaPayload,
    responses(
        (status = 201, description = "Troca registrada", body = Troca),
        (status = 400, description = "Campos ausentes ou inválidos"),
        (status = 404, description = "Pedido, produto ou item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_troca(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(payload): AppJson<CriarTrocaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let troca = app_state
        .troca_service
        .create(
            payload.pedido_id,
            payload.item_pedido_id,
            payload.produto_id,
            payload.quantidade,
            payload.valor_troca,
            payload.motivo.as_deref(),
            user.0.usuario_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(troca)))
}

// GET /trocas/{id}
#[utoipa::path(
    get,
    path = "/trocas/{id}",
    tag = "Trocas",
    params(("id" = i32, Path, description = "ID da troca")),
    responses(
        (status = 200, description = "Troca", body = Troca),
        (status = 404, description = "Troca não encontrada")
    )
)]
pub async fn get_troca(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let troca = app_state.troca_service.get(id).await?;
    Ok(Json(troca))
}

// DELETE /trocas/{id}
#[utoipa::path(
    delete,
    path = "/trocas/{id}",
    tag = "Trocas",
    params(("id" = i32, Path, description = "ID da troca")),
    responses(
        (status = 204, description = "Troca removida"),
        (status = 404, description = "Troca não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_troca(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.troca_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
