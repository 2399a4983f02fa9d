// src/db/troca_repo.rs

use sqlx::{Executor, Postgres};

use crate::{
    common::{db_utils, error::AppError},
    models::troca::{NovaTroca, Troca, TrocaDetalhe},
};

#[derive(Clone, Default)]
pub struct TrocaRepository;

impl TrocaRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(&self, executor: E, nova: &NovaTroca) -> Result<Troca, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Troca>(
            r#"
            INSERT INTO trocas (
                pedido_id, item_pedido_id, produto_id, quantidade,
                valor_troca, motivo, criado_por
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(nova.pedido_id)
        .bind(nova.item_pedido_id)
        .bind(nova.produto_id)
        .bind(nova.quantidade)
        .bind(nova.valor_troca)
        .bind(nova.motivo.as_deref())
        .bind(nova.usuario_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            db_utils::map_fk_violation(e, |constraint| match constraint {
                "trocas_pedido_id_fkey" => Some(format!("Pedido {}", nova.pedido_id)),
                "trocas_produto_id_fkey" => Some(format!("Produto {}", nova.produto_id)),
                "trocas_item_pedido_id_fkey" => Some(format!(
                    "Item do pedido {}",
                    nova.item_pedido_id.unwrap_or_default()
                )),
                _ => None,
            })
        })
    }

    pub async fn find<'e, E>(&self, executor: E, troca_id: i32) -> Result<Option<Troca>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let troca = sqlx::query_as::<_, Troca>("SELECT * FROM trocas WHERE id = $1")
            .bind(troca_id)
            .fetch_optional(executor)
            .await?;

        Ok(troca)
    }

    /// Trocas do pedido com nome e imagem do produto, mais recentes primeiro.
    pub async fn list_for_pedido<'e, E>(
        &self,
        executor: E,
        pedido_id: i32,
    ) -> Result<Vec<TrocaDetalhe>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let trocas = sqlx::query_as::<_, TrocaDetalhe>(
            r#"
            SELECT t.*, p.nome AS produto_nome, p.imagem_url AS produto_imagem_url
            FROM trocas t
            JOIN produtos p ON p.id = t.produto_id
            WHERE t.pedido_id = $1
            ORDER BY t.criado_em DESC, t.id DESC
            "#,
        )
        .bind(pedido_id)
        .fetch_all(executor)
        .await?;

        Ok(trocas)
    }

    /// Devolve `false` se a troca não existia.
    pub async fn delete<'e, E>(&self, executor: E, troca_id: i32) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM trocas WHERE id = $1")
            .bind(troca_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Zera o vínculo com itens para todas as trocas do pedido
    /// (e qualquer outra que aponte para um item dele). As trocas continuam existindo.
    pub async fn detach_for_pedido<'e, E>(&self, executor: E, pedido_id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE trocas
            SET item_pedido_id = NULL
            WHERE item_pedido_id IS NOT NULL
              AND (
                  pedido_id = $1
                  OR item_pedido_id IN (SELECT id FROM itens_pedido WHERE pedido_id = $1)
              )
            "#,
        )
        .bind(pedido_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn item_belongs_to_pedido<'e, E>(
        &self,
        executor: E,
        item_pedido_id: i32,
        pedido_id: i32,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM itens_pedido WHERE id = $1 AND pedido_id = $2 FOR SHARE",
        )
        .bind(item_pedido_id)
        .bind(pedido_id)
        .fetch_optional(executor)
        .await?;

        Ok(found.is_some())
    }
}
