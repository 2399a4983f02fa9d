// src/models/pedido.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// --- Enums ---

/// Ciclo de vida do pedido. Mapeia o `CREATE TYPE pedido_status` do banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pedido_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusPedido {
    EmEspera,  // "EM_ESPERA" - status inicial
    Conferir,  // "CONFERIR"  - aguardando remaneio
    Efetivado, // "EFETIVADO" - venda concluída
    Cancelado, // "CANCELADO"
}

impl StatusPedido {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPedido::EmEspera => "EM_ESPERA",
            StatusPedido::Conferir => "CONFERIR",
            StatusPedido::Efetivado => "EFETIVADO",
            StatusPedido::Cancelado => "CANCELADO",
        }
    }
}

// --- Structs de Leitura ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Pedido {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "C001-lt7x9k2a")]
    pub chave_pedido: String,
    #[schema(example = 1)]
    pub cliente_id: i32,
    pub rota_id: Option<i32>,
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub data: NaiveDate,
    pub status: StatusPedido,
    /// Só é preenchido enquanto o status for CONFERIR.
    #[schema(example = 1)]
    pub ordem_remaneio: Option<i32>,
    #[schema(value_type = String, example = "30.00")]
    pub valor_total: Decimal,
    #[schema(value_type = Option<String>, example = "28.50")]
    pub valor_efetivado: Option<Decimal>,
    pub criado_por: Option<i32>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_por: Option<i32>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ItemPedido {
    pub id: i32,
    pub pedido_id: i32,
    #[schema(example = 7)]
    pub produto_id: i32,
    #[schema(value_type = String, example = "3.000")]
    pub quantidade: Decimal,
    #[schema(example = "Caixa 12un")]
    pub embalagem: Option<String>,
    #[schema(value_type = String, example = "10.00")]
    pub valor_unitario: Decimal,
    #[schema(value_type = String, example = "30.00")]
    pub valor_total_item: Decimal,
    #[schema(value_type = String, example = "0.00")]
    pub comissao: Decimal,
}

/// Pedido com seus itens, como devolvido pela API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PedidoDetalhe {
    #[serde(flatten)]
    pub pedido: Pedido,
    pub itens: Vec<ItemPedido>,
}

// --- Structs de Escrita ---

/// Item como chega do cliente, antes da normalização.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ItemEntrada {
    #[validate(range(min = 1, message = "produto_id inválido"))]
    #[schema(example = 7)]
    pub produto_id: i32,

    #[schema(value_type = String, example = "3")]
    pub quantidade: Decimal,

    #[validate(length(max = 60, message = "embalagem muito longa"))]
    #[schema(example = "Caixa 12un")]
    pub embalagem: Option<String>,

    #[schema(value_type = String, example = "10.00")]
    pub valor_unitario: Decimal,

    #[schema(value_type = Option<String>, example = "0.50")]
    pub comissao: Option<Decimal>,
}

/// Parâmetros de `GET /pedidos/paginado`, ainda crus.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConsultaPaginada {
    /// Página a partir de 1
    pub pagina: Option<i64>,
    /// Itens por página (1 a 100)
    pub limite: Option<i64>,
    pub status: Option<String>,
    pub cliente_id: Option<i32>,
    pub rota_id: Option<i32>,
    /// YYYY-MM-DD
    pub data_inicio: Option<String>,
    /// YYYY-MM-DD
    pub data_fim: Option<String>,
}

/// Linha já validada e com total calculado, pronta para o INSERT em lote.
#[derive(Debug, Clone, PartialEq)]
pub struct NovoItem {
    pub produto_id: i32,
    pub quantidade: Decimal,
    pub embalagem: Option<String>,
    pub valor_unitario: Decimal,
    pub valor_total_item: Decimal,
    pub comissao: Decimal,
}

#[derive(Debug, Clone)]
pub struct NovoPedido {
    pub chave_pedido: String,
    pub cliente_id: i32,
    pub rota_id: Option<i32>,
    pub data: NaiveDate,
    pub status: StatusPedido,
    pub usuario_id: i32,
}

/// Alterações parciais do cabeçalho. `None` = não mexer.
/// `rota_id: Some(None)` limpa a rota.
#[derive(Debug, Clone, Default)]
pub struct AlteracaoPedido {
    pub rota_id: Option<Option<i32>>,
    pub data: Option<NaiveDate>,
    pub status: Option<StatusPedido>,
    pub valor_efetivado: Option<Decimal>,
}

impl AlteracaoPedido {
    pub fn is_empty(&self) -> bool {
        self.rota_id.is_none()
            && self.data.is_none()
            && self.status.is_none()
            && self.valor_efetivado.is_none()
    }
}

/// Filtros da listagem. Todos opcionais; `limite: None` devolve tudo.
#[derive(Debug, Clone, Default)]
pub struct FiltroPedidos {
    pub status: Option<StatusPedido>,
    pub cliente_id: Option<i32>,
    pub rota_id: Option<i32>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub limite: Option<i64>,
    pub offset: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginaPedidos {
    pub dados: Vec<PedidoDetalhe>,
    pub total: i64,
    pub pagina: i64,
    pub limite: i64,
}
