// src/db/pedido_repo.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgConnection, Postgres};

use crate::{
    common::{db_utils, error::AppError},
    db::TrocaRepository,
    models::pedido::{
        AlteracaoPedido, FiltroPedidos, ItemPedido, NovoItem, NovoPedido, Pedido, PedidoDetalhe,
        StatusPedido,
    },
};

// Próxima posição livre no remaneio (1 quando ninguém está em CONFERIR).
// Usada como subquery para o cálculo acontecer no mesmo statement do UPDATE/INSERT.
const PROXIMA_ORDEM: &str =
    "(SELECT COALESCE(MAX(p2.ordem_remaneio), 0) + 1 FROM pedidos p2 WHERE p2.status = 'CONFERIR')";

// Chave do advisory lock que serializa toda atribuição de posição no remaneio.
const LOCK_REMANEIO: i64 = 0x5245_4d41_4e45_494f;

// Filtro compartilhado entre a listagem e a contagem.
const WHERE_FILTRO: &str = r#"
    WHERE ($1::pedido_status IS NULL OR status = $1)
      AND ($2::int IS NULL OR cliente_id = $2)
      AND ($3::int IS NULL OR rota_id = $3)
      AND ($4::date IS NULL OR data >= $4)
      AND ($5::date IS NULL OR data <= $5)
"#;

// Ordenação oficial: fila do remaneio primeiro (pela posição), o resto por data e id decrescentes.
const ORDER_BY_LISTAGEM: &str = r#"
    ORDER BY (status = 'CONFERIR' AND ordem_remaneio IS NOT NULL) DESC,
             CASE WHEN status = 'CONFERIR' THEN ordem_remaneio END ASC NULLS LAST,
             data DESC,
             id DESC
"#;

#[derive(Clone)]
pub struct PedidoRepository {
    trocas: TrocaRepository,
}

impl PedidoRepository {
    pub fn new(trocas: TrocaRepository) -> Self {
        Self { trocas }
    }

    // =========================================================================
    //  PEDIDOS
    // =========================================================================

    pub async fn insert_pedido<'e, E>(
        &self,
        executor: E,
        novo: &NovoPedido,
    ) -> Result<Pedido, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO pedidos (
                chave_pedido, cliente_id, rota_id, data, status, ordem_remaneio,
                criado_por, atualizado_por
            )
            VALUES (
                $1, $2, $3, $4, $5,
                CASE WHEN $5 = 'CONFERIR'::pedido_status THEN {PROXIMA_ORDEM} END,
                $6, $6
            )
            RETURNING *
            "#
        );

        sqlx::query_as::<_, Pedido>(&sql)
            .bind(&novo.chave_pedido)
            .bind(novo.cliente_id)
            .bind(novo.rota_id)
            .bind(novo.data)
            .bind(novo.status)
            .bind(novo.usuario_id)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if db_utils::is_unique_violation(&e) {
                    return AppError::Conflict(format!(
                        "Já existe um pedido com a chave '{}'.",
                        novo.chave_pedido
                    ));
                }
                db_utils::map_fk_violation(e, |constraint| match constraint {
                    "pedidos_rota_id_fkey" => Some(format!("Rota {}", novo.rota_id.unwrap_or_default())),
                    "pedidos_cliente_id_fkey" => Some(format!("Cliente {}", novo.cliente_id)),
                    _ => None,
                })
            })
    }

    pub async fn find_pedido<'e, E>(
        &self,
        executor: E,
        pedido_id: i32,
    ) -> Result<Option<Pedido>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pedido = sqlx::query_as::<_, Pedido>("SELECT * FROM pedidos WHERE id = $1")
            .bind(pedido_id)
            .fetch_optional(executor)
            .await?;

        Ok(pedido)
    }

    /// Trava o pedido contra remoção até o fim da transação.
    pub async fn exists_for_share<'e, E>(&self, executor: E, pedido_id: i32) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found: Option<i32> = sqlx::query_scalar("SELECT id FROM pedidos WHERE id = $1 FOR SHARE")
            .bind(pedido_id)
            .fetch_optional(executor)
            .await?;

        Ok(found.is_some())
    }

    /// Atualização parcial do cabeçalho.
    ///
    /// O `ordem_remaneio` segue o status final da linha: fora de CONFERIR vira NULL;
    /// em CONFERIR mantém o valor atual ou recebe a próxima posição livre.
    /// Devolve `None` se o pedido não existe.
    pub async fn update_fields<'e, E>(
        &self,
        executor: E,
        pedido_id: i32,
        alteracao: &AlteracaoPedido,
        usuario_id: i32,
    ) -> Result<Option<Pedido>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE pedidos
            SET rota_id = CASE WHEN $2 THEN $3 ELSE rota_id END,
                data = COALESCE($4, data),
                status = COALESCE($5, status),
                ordem_remaneio = CASE
                    WHEN COALESCE($5, status) <> 'CONFERIR'::pedido_status THEN NULL
                    WHEN ordem_remaneio IS NOT NULL THEN ordem_remaneio
                    ELSE {PROXIMA_ORDEM}
                END,
                valor_efetivado = COALESCE($6, valor_efetivado),
                atualizado_por = $7,
                atualizado_em = NOW()
            WHERE id = $1
            RETURNING *
            "#
        );

        let (altera_rota, nova_rota) = match alteracao.rota_id {
            Some(rota) => (true, rota),
            None => (false, None),
        };

        sqlx::query_as::<_, Pedido>(&sql)
            .bind(pedido_id)
            .bind(altera_rota)
            .bind(nova_rota)
            .bind(alteracao.data)
            .bind(alteracao.status)
            .bind(alteracao.valor_efetivado)
            .bind(usuario_id)
            .fetch_optional(executor)
            .await
            .map_err(|e| {
                db_utils::map_fk_violation(e, |constraint| {
                    (constraint == "pedidos_rota_id_fkey")
                        .then(|| format!("Rota {}", nova_rota.unwrap_or_default()))
                })
            })
    }

    // Recalcula e atualiza o total em UMA única query, a partir dos itens gravados.
    pub async fn recalculate_total<'e, E>(
        &self,
        executor: E,
        pedido_id: i32,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Decimal = sqlx::query_scalar(
            r#"
            UPDATE pedidos
            SET valor_total = (
                SELECT COALESCE(SUM(valor_total_item), 0)
                FROM itens_pedido
                WHERE itens_pedido.pedido_id = pedidos.id
            )
            WHERE id = $1
            RETURNING valor_total
            "#,
        )
        .bind(pedido_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    /// INSERT em lote: uma ida ao banco para todos os itens do pedido.
    pub async fn insert_itens<'e, E>(
        &self,
        executor: E,
        pedido_id: i32,
        itens: &[NovoItem],
    ) -> Result<Vec<ItemPedido>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if itens.is_empty() {
            return Ok(vec![]);
        }

        let produtos: Vec<i32> = itens.iter().map(|i| i.produto_id).collect();
        let quantidades: Vec<Decimal> = itens.iter().map(|i| i.quantidade).collect();
        let embalagens: Vec<Option<String>> = itens.iter().map(|i| i.embalagem.clone()).collect();
        let unitarios: Vec<Decimal> = itens.iter().map(|i| i.valor_unitario).collect();
        let totais: Vec<Decimal> = itens.iter().map(|i| i.valor_total_item).collect();
        let comissoes: Vec<Decimal> = itens.iter().map(|i| i.comissao).collect();

        let mut inseridos = sqlx::query_as::<_, ItemPedido>(
            r#"
            INSERT INTO itens_pedido (
                pedido_id, produto_id, quantidade, embalagem,
                valor_unitario, valor_total_item, comissao
            )
            SELECT $1::int, * FROM UNNEST(
                $2::int[], $3::numeric[], $4::text[],
                $5::numeric[], $6::numeric[], $7::numeric[]
            )
            RETURNING *
            "#,
        )
        .bind(pedido_id)
        .bind(&produtos)
        .bind(&quantidades)
        .bind(&embalagens)
        .bind(&unitarios)
        .bind(&totais)
        .bind(&comissoes)
        .fetch_all(executor)
        .await
        .map_err(|e| {
            db_utils::map_fk_violation(e, |constraint| {
                (constraint == "itens_pedido_produto_id_fkey").then(|| "Produto".to_string())
            })
        })?;

        inseridos.sort_by_key(|item| item.id);
        Ok(inseridos)
    }

    pub async fn delete_itens<'e, E>(&self, executor: E, pedido_id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM itens_pedido WHERE pedido_id = $1")
            .bind(pedido_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Troca o conjunto inteiro de itens: desvincula trocas, apaga, insere e
    /// recalcula o total. Tudo ou nada (savepoint se já houver transação aberta).
    pub async fn replace_itens<'e, A>(
        &self,
        conn: A,
        pedido_id: i32,
        itens: &[NovoItem],
    ) -> Result<Vec<ItemPedido>, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let mut tx = conn.begin().await?;

        let desvinculadas = self.trocas.detach_for_pedido(&mut *tx, pedido_id).await?;
        if desvinculadas > 0 {
            tracing::debug!(pedido_id, desvinculadas, "Trocas desvinculadas dos itens antigos");
        }

        self.delete_itens(&mut *tx, pedido_id).await?;
        let inseridos = self.insert_itens(&mut *tx, pedido_id, itens).await?;
        self.recalculate_total(&mut *tx, pedido_id).await?;

        tx.commit().await?;
        Ok(inseridos)
    }

    pub async fn list_itens<'e, E>(
        &self,
        executor: E,
        pedido_ids: &[i32],
    ) -> Result<Vec<ItemPedido>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itens = sqlx::query_as::<_, ItemPedido>(
            "SELECT * FROM itens_pedido WHERE pedido_id = ANY($1) ORDER BY pedido_id, id",
        )
        .bind(pedido_ids)
        .fetch_all(executor)
        .await?;

        Ok(itens)
    }

    pub async fn find_with_itens(
        &self,
        conn: &mut PgConnection,
        pedido_id: i32,
    ) -> Result<Option<PedidoDetalhe>, AppError> {
        let Some(pedido) = self.find_pedido(&mut *conn, pedido_id).await? else {
            return Ok(None);
        };
        let itens = self.list_itens(&mut *conn, &[pedido_id]).await?;

        Ok(Some(PedidoDetalhe { pedido, itens }))
    }

    // =========================================================================
    //  LISTAGEM
    // =========================================================================

    pub async fn list_pedidos(
        &self,
        conn: &mut PgConnection,
        filtro: &FiltroPedidos,
    ) -> Result<Vec<PedidoDetalhe>, AppError> {
        let sql = format!("SELECT * FROM pedidos {WHERE_FILTRO} {ORDER_BY_LISTAGEM} LIMIT $6 OFFSET $7");

        let pedidos = sqlx::query_as::<_, Pedido>(&sql)
            .bind(filtro.status)
            .bind(filtro.cliente_id)
            .bind(filtro.rota_id)
            .bind(filtro.data_inicio)
            .bind(filtro.data_fim)
            .bind(filtro.limite)
            .bind(filtro.offset)
            .fetch_all(&mut *conn)
            .await?;

        if pedidos.is_empty() {
            return Ok(vec![]);
        }

        // Busca os itens de todos os pedidos da página de uma vez
        let ids: Vec<i32> = pedidos.iter().map(|p| p.id).collect();
        let mut por_pedido: HashMap<i32, Vec<ItemPedido>> = HashMap::new();
        for item in self.list_itens(&mut *conn, &ids).await? {
            por_pedido.entry(item.pedido_id).or_default().push(item);
        }

        Ok(pedidos
            .into_iter()
            .map(|pedido| {
                let itens = por_pedido.remove(&pedido.id).unwrap_or_default();
                PedidoDetalhe { pedido, itens }
            })
            .collect())
    }

    pub async fn count_pedidos<'e, E>(
        &self,
        executor: E,
        filtro: &FiltroPedidos,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT COUNT(*) FROM pedidos {WHERE_FILTRO}");

        let total: i64 = sqlx::query_scalar(&sql)
            .bind(filtro.status)
            .bind(filtro.cliente_id)
            .bind(filtro.rota_id)
            .bind(filtro.data_inicio)
            .bind(filtro.data_fim)
            .fetch_one(executor)
            .await?;

        Ok(total)
    }

    // =========================================================================
    //  REMANEIO
    // =========================================================================

    /// Trava a numeração do remaneio até o fim da transação. Tem que vir antes de
    /// qualquer statement que use `PROXIMA_ORDEM` ou regrave a fila.
    pub async fn lock_remaneio<'e, E>(&self, executor: E) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(LOCK_REMANEIO)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Fila atual do remaneio, travando as linhas até o fim da transação.
    pub async fn lock_fila_remaneio<'e, E>(&self, executor: E) -> Result<Vec<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT id FROM pedidos
            WHERE status = 'CONFERIR'
            ORDER BY ordem_remaneio ASC NULLS LAST, data DESC, id DESC
            FOR UPDATE
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(ids)
    }

    /// Grava as posições em um único UPDATE. Linhas que saíram de CONFERIR
    /// no meio do caminho ficam de fora pelo predicado.
    pub async fn apply_ordem_remaneio<'e, E>(
        &self,
        executor: E,
        sequencia: &[i32],
        usuario_id: i32,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let posicoes: Vec<i32> = (1..=sequencia.len() as i32).collect();

        let result = sqlx::query(
            r#"
            UPDATE pedidos p
            SET ordem_remaneio = v.posicao,
                atualizado_por = $3,
                atualizado_em = NOW()
            FROM UNNEST($1::int[], $2::int[]) AS v(id, posicao)
            WHERE p.id = v.id
              AND p.status = $4
            "#,
        )
        .bind(sequencia)
        .bind(&posicoes)
        .bind(usuario_id)
        .bind(StatusPedido::Conferir)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
