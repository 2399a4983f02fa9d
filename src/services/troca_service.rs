// src/services/troca_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        normalize::{normalize_image_url, normalize_money, normalize_quantity},
    },
    db::{CadastroRepository, PedidoRepository, TrocaRepository},
    models::troca::{NovaTroca, Troca, TrocaDetalhe},
};

#[derive(Clone)]
pub struct TrocaService {
    pool: PgPool,
    repo: TrocaRepository,
    pedidos: PedidoRepository,
    cadastros: CadastroRepository,
}

impl TrocaService {
    pub fn new(
        pool: PgPool,
        repo: TrocaRepository,
        pedidos: PedidoRepository,
        cadastros: CadastroRepository,
    ) -> Self {
        Self { pool, repo, pedidos, cadastros }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        pedido_id: i32,
        item_pedido_id: Option<i32>,
        produto_id: i32,
        quantidade: Decimal,
        valor_troca: Option<Decimal>,
        motivo: Option<&str>,
        usuario_id: i32,
    ) -> Result<Troca, AppError> {
        let quantidade = normalize_quantity(quantidade).ok_or_else(|| {
            AppError::InvalidInput("quantidade deve ser maior que zero.".into())
        })?;
        let valor_troca = normalize_money(valor_troca.unwrap_or(Decimal::ZERO)).ok_or_else(|| {
            AppError::InvalidInput("valor_troca não pode ser negativo.".into())
        })?;
        let motivo = motivo.map(str::trim).filter(|m| !m.is_empty()).map(str::to_string);

        let mut tx = self.pool.begin().await?;

        if !self.pedidos.exists_for_share(&mut *tx, pedido_id).await? {
            return Err(AppError::ResourceNotFound(format!("Pedido {}", pedido_id)));
        }

        let faltando = self.cadastros.missing_produtos(&mut *tx, &[produto_id]).await?;
        if !faltando.is_empty() {
            return Err(AppError::ResourceNotFound(format!("Produto {}", produto_id)));
        }

        // O item, quando informado, precisa ser deste pedido
        if let Some(item_id) = item_pedido_id {
            if !self.repo.item_belongs_to_pedido(&mut *tx, item_id, pedido_id).await? {
                return Err(AppError::ResourceNotFound(format!("Item do pedido {}", item_id)));
            }
        }

        let troca = self
            .repo
            .insert(
                &mut *tx,
                &NovaTroca {
                    pedido_id,
                    item_pedido_id,
                    produto_id,
                    quantidade,
                    valor_troca,
                    motivo,
                    usuario_id,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(troca_id = troca.id, pedido_id, produto_id, "Troca registrada");
        Ok(troca)
    }

    pub async fn get(&self, troca_id: i32) -> Result<Troca, AppError> {
        self.repo
            .find(&self.pool, troca_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Troca {}", troca_id)))
    }

    pub async fn list_for_pedido(&self, pedido_id: i32) -> Result<Vec<TrocaDetalhe>, AppError> {
        if self.pedidos.find_pedido(&self.pool, pedido_id).await?.is_none() {
            return Err(AppError::ResourceNotFound(format!("Pedido {}", pedido_id)));
        }

        let mut trocas = self.repo.list_for_pedido(&self.pool, pedido_id).await?;

        // URLs quebradas no cadastro não chegam ao cliente
        for troca in &mut trocas {
            troca.produto_imagem_url = troca
                .produto_imagem_url
                .as_deref()
                .and_then(normalize_image_url);
        }

        Ok(trocas)
    }

    pub async fn delete(&self, troca_id: i32) -> Result<(), AppError> {
        if !self.repo.delete(&self.pool, troca_id).await? {
            return Err(AppError::ResourceNotFound(format!("Troca {}", troca_id)));
        }

        tracing::info!(troca_id, "Troca removida");
        Ok(())
    }
}
