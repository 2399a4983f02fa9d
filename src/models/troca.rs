// src/models/troca.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Troca pós-venda. O vínculo com o item do pedido é opcional e pode ser
// desfeito quando os itens do pedido são substituídos.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Troca {
    pub id: i32,
    pub pedido_id: i32,
    pub item_pedido_id: Option<i32>,
    pub produto_id: i32,
    #[schema(value_type = String, example = "1.000")]
    pub quantidade: Decimal,
    #[schema(value_type = String, example = "0.00")]
    pub valor_troca: Decimal,
    #[schema(example = "Produto avariado na entrega")]
    pub motivo: Option<String>,
    pub criado_por: Option<i32>,
    pub criado_em: DateTime<Utc>,
}

// Linha da listagem por pedido, com os dados do produto para exibição.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TrocaDetalhe {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub troca: Troca,
    pub produto_nome: String,
    pub produto_imagem_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NovaTroca {
    pub pedido_id: i32,
    pub item_pedido_id: Option<i32>,
    pub produto_id: i32,
    pub quantidade: Decimal,
    pub valor_troca: Decimal,
    pub motivo: Option<String>,
    pub usuario_id: i32,
}
