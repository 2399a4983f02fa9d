// src/services/remaneio_service.rs

use std::collections::HashSet;

use sqlx::PgPool;

use crate::{common::error::AppError, db::PedidoRepository};

#[derive(Clone)]
pub struct RemaneioService {
    pool: PgPool,
    repo: PedidoRepository,
}

impl RemaneioService {
    pub fn new(pool: PgPool, repo: PedidoRepository) -> Self {
        Self { pool, repo }
    }

    /// Coloca os pedidos informados no topo da fila de remaneio, na ordem dada.
    /// Os demais pedidos em CONFERIR mantêm a ordem relativa logo atrás.
    ///
    /// Devolve quantos pedidos tiveram a posição gravada.
    pub async fn reorder(&self, ids: &[i64], usuario_id: i32) -> Result<u64, AppError> {
        let solicitados = parse_ids(ids)?;

        let mut tx = self.pool.begin().await?;

        // 1. Fila atual, travada até o commit
        self.repo.lock_remaneio(&mut *tx).await?;
        let atual = self.repo.lock_fila_remaneio(&mut *tx).await?;

        // 2. Sequência final (ou os ids que não estão na fila)
        let sequencia = match plan_sequence(&atual, &solicitados) {
            Ok(sequencia) => sequencia,
            Err(invalidos) => {
                // O drop da transação faz o rollback
                tracing::warn!(?invalidos, "Remaneio recusado: ids fora do status CONFERIR");
                return Err(AppError::InvalidSequence(
                    invalidos.into_iter().map(i64::from).collect(),
                ));
            }
        };

        // 3. Um único UPDATE em lote
        let total = self
            .repo
            .apply_ordem_remaneio(&mut *tx, &sequencia, usuario_id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            solicitados = solicitados.len(),
            fila = sequencia.len(),
            total,
            "Remaneio reordenado"
        );
        Ok(total)
    }
}

/// Valida os ids recebidos: lista não vazia, inteiros positivos que caibam em `i32`.
/// Repetições são descartadas mantendo a primeira ocorrência.
pub(crate) fn parse_ids(ids: &[i64]) -> Result<Vec<i32>, AppError> {
    if ids.is_empty() {
        return Err(AppError::InvalidInput("Informe ao menos um id de pedido.".into()));
    }

    let invalidos: Vec<i64> = ids
        .iter()
        .copied()
        .filter(|id| *id <= 0 || i32::try_from(*id).is_err())
        .collect();
    if !invalidos.is_empty() {
        return Err(AppError::InvalidSequence(invalidos));
    }

    let mut vistos = HashSet::new();
    Ok(ids
        .iter()
        .filter_map(|id| i32::try_from(*id).ok())
        .filter(|id| vistos.insert(*id))
        .collect())
}

/// Sequência final do remaneio: os `solicitados` na ordem dada, seguidos dos
/// demais ids de `atual` na ordem em que já estavam.
///
/// `Err` traz os solicitados que não fazem parte de `atual`.
pub(crate) fn plan_sequence(atual: &[i32], solicitados: &[i32]) -> Result<Vec<i32>, Vec<i32>> {
    let na_fila: HashSet<i32> = atual.iter().copied().collect();

    let invalidos: Vec<i32> = solicitados
        .iter()
        .copied()
        .filter(|id| !na_fila.contains(id))
        .collect();
    if !invalidos.is_empty() {
        return Err(invalidos);
    }

    let escolhidos: HashSet<i32> = solicitados.iter().copied().collect();
    let mut sequencia = solicitados.to_vec();
    sequencia.extend(atual.iter().copied().filter(|id| !escolhidos.contains(id)));

    Ok(sequencia)
}
