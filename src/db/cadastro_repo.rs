// src/db/cadastro_repo.rs

// Consultas de existência nos cadastros (clientes, produtos, rotas).
// O CRUD desses cadastros não pertence a este serviço.

use sqlx::{Executor, FromRow, Postgres};

use crate::common::error::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct ClienteResumo {
    pub id: i32,
    pub codigo: Option<String>,
}

#[derive(Clone, Default)]
pub struct CadastroRepository;

impl CadastroRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_cliente<'e, E>(
        &self,
        executor: E,
        cliente_id: i32,
    ) -> Result<Option<ClienteResumo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, ClienteResumo>(
            "SELECT id, codigo FROM clientes WHERE id = $1 FOR SHARE",
        )
        .bind(cliente_id)
        .fetch_optional(executor)
        .await?;

        Ok(cliente)
    }

    /// Ids de `produto_ids` que não existem, na ordem em que foram pedidos.
    /// Os existentes ficam travados (FOR SHARE) até o fim da transação.
    pub async fn missing_produtos<'e, E>(
        &self,
        executor: E,
        produto_ids: &[i32],
    ) -> Result<Vec<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if produto_ids.is_empty() {
            return Ok(vec![]);
        }

        let existentes: Vec<i32> = sqlx::query_scalar(
            "SELECT id FROM produtos WHERE id = ANY($1) FOR SHARE",
        )
        .bind(produto_ids)
        .fetch_all(executor)
        .await?;

        let mut faltando: Vec<i32> = Vec::new();
        for id in produto_ids {
            if !existentes.contains(id) && !faltando.contains(id) {
                faltando.push(*id);
            }
        }
        Ok(faltando)
    }

    pub async fn rota_exists<'e, E>(&self, executor: E, rota_id: i32) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found: Option<i32> = sqlx::query_scalar("SELECT id FROM rotas WHERE id = $1")
            .bind(rota_id)
            .fetch_optional(executor)
            .await?;

        Ok(found.is_some())
    }
}
