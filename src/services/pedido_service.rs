// src/services/pedido_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        normalize::{line_total, normalize_date, normalize_money, normalize_quantity, normalize_status},
    },
    db::{CadastroRepository, PedidoRepository},
    models::pedido::{
        AlteracaoPedido, ConsultaPaginada, FiltroPedidos, ItemEntrada, NovoItem, NovoPedido,
        PaginaPedidos, Pedido, PedidoDetalhe, StatusPedido,
    },
};

const LIMITE_PADRAO: i64 = 20;
const LIMITE_MAXIMO: i64 = 100;

#[derive(Clone)]
pub struct PedidoService {
    pool: PgPool,
    repo: PedidoRepository,
    cadastros: CadastroRepository,
}

impl PedidoService {
    pub fn new(pool: PgPool, repo: PedidoRepository, cadastros: CadastroRepository) -> Self {
        Self { pool, repo, cadastros }
    }

    // =========================================================================
    //  CRIAÇÃO
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        chave_pedido: Option<&str>,
        cliente_id: i32,
        rota_id: Option<i32>,
        data: &str,
        status: Option<&str>,
        itens: &[ItemEntrada],
        usuario_id: i32,
    ) -> Result<PedidoDetalhe, AppError> {
        // 1. Tudo que dá para validar sem banco vem antes da transação
        let data = parse_data(data)?;
        let status = match status {
            Some(s) => parse_status(s)?,
            None => StatusPedido::EmEspera,
        };
        if itens.is_empty() {
            return Err(AppError::InvalidInput("O pedido precisa de ao menos um item.".into()));
        }
        let novos_itens = prepare_itens(itens)?;

        let mut tx = self.pool.begin().await?;

        // 2. Cadastros referenciados
        let cliente = self
            .cadastros
            .find_cliente(&mut *tx, cliente_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Cliente {}", cliente_id)))?;

        if let Some(rota) = rota_id {
            if !self.cadastros.rota_exists(&mut *tx, rota).await? {
                return Err(AppError::ResourceNotFound(format!("Rota {}", rota)));
            }
        }

        self.ensure_produtos(&mut tx, &novos_itens).await?;

        if status == StatusPedido::Conferir {
            self.repo.lock_remaneio(&mut *tx).await?;
        }

        // 3. Cabeçalho + itens + total, na mesma transação
        let chave = match chave_pedido.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => c.to_string(),
            None => generate_order_key(
                cliente.codigo.as_deref(),
                cliente.id,
                Utc::now().timestamp_millis(),
            ),
        };

        let mut pedido = self
            .repo
            .insert_pedido(
                &mut *tx,
                &NovoPedido {
                    chave_pedido: chave,
                    cliente_id,
                    rota_id,
                    data,
                    status,
                    usuario_id,
                },
            )
            .await?;

        let itens = self.repo.insert_itens(&mut *tx, pedido.id, &novos_itens).await?;
        pedido.valor_total = self.repo.recalculate_total(&mut *tx, pedido.id).await?;

        tx.commit().await?;

        tracing::info!(
            pedido_id = pedido.id,
            chave = %pedido.chave_pedido,
            total = %pedido.valor_total,
            "Pedido criado"
        );
        Ok(PedidoDetalhe { pedido, itens })
    }

    // =========================================================================
    //  ATUALIZAÇÃO COMPLETA
    // =========================================================================

    /// Atualização parcial: só os campos informados mudam.
    /// `rota_id: Some(None)` remove a rota; `itens: Some(..)` substitui todos os itens.
    pub async fn replace_full(
        &self,
        pedido_id: i32,
        rota_id: Option<Option<i32>>,
        data: Option<&str>,
        status: Option<&str>,
        itens: Option<&[ItemEntrada]>,
        usuario_id: i32,
    ) -> Result<PedidoDetalhe, AppError> {
        let alteracao = AlteracaoPedido {
            rota_id,
            data: data.map(parse_data).transpose()?,
            status: status.map(parse_status).transpose()?,
            valor_efetivado: None,
        };

        let novos_itens = match itens {
            Some([]) => {
                return Err(AppError::InvalidInput("O pedido precisa de ao menos um item.".into()));
            }
            Some(itens) => Some(prepare_itens(itens)?),
            None => None,
        };

        if alteracao.is_empty() && novos_itens.is_none() {
            return Err(AppError::InvalidInput("Nenhum campo para atualizar.".into()));
        }

        let mut tx = self.pool.begin().await?;

        // Mesmo sem `status` o pedido pode já estar em CONFERIR sem posição
        self.repo.lock_remaneio(&mut *tx).await?;

        if self.repo.find_pedido(&mut *tx, pedido_id).await?.is_none() {
            return Err(AppError::ResourceNotFound(format!("Pedido {}", pedido_id)));
        }

        if let Some(Some(rota)) = alteracao.rota_id {
            if !self.cadastros.rota_exists(&mut *tx, rota).await? {
                return Err(AppError::ResourceNotFound(format!("Rota {}", rota)));
            }
        }

        if let Some(novos_itens) = &novos_itens {
            self.ensure_produtos(&mut tx, novos_itens).await?;
            self.repo.replace_itens(&mut *tx, pedido_id, novos_itens).await?;
        }

        // Sempre passa pelo UPDATE para carimbar a auditoria
        let pedido = self
            .repo
            .update_fields(&mut *tx, pedido_id, &alteracao, usuario_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Pedido {}", pedido_id)))?;

        let itens = self.repo.list_itens(&mut *tx, &[pedido_id]).await?;

        tx.commit().await?;

        tracing::info!(pedido_id, itens_substituidos = novos_itens.is_some(), "Pedido atualizado");
        Ok(PedidoDetalhe { pedido, itens })
    }

    // =========================================================================
    //  TRANSIÇÃO DE STATUS
    // =========================================================================

    /// Qualquer status pode ir para qualquer outro. O que importa são os efeitos
    /// no `ordem_remaneio` (ver `PedidoRepository::update_fields`).
    pub async fn transition_status(
        &self,
        pedido_id: i32,
        status: &str,
        valor_efetivado: Option<Decimal>,
        data: Option<&str>,
        usuario_id: i32,
    ) -> Result<Pedido, AppError> {
        let alteracao = AlteracaoPedido {
            rota_id: None,
            status: Some(parse_status(status)?),
            data: data.map(parse_data).transpose()?,
            valor_efetivado: valor_efetivado
                .map(|v| {
                    normalize_money(v).ok_or_else(|| {
                        AppError::InvalidInput("valor_efetivado não pode ser negativo.".into())
                    })
                })
                .transpose()?,
        };

        let mut tx = self.pool.begin().await?;

        if alteracao.status == Some(StatusPedido::Conferir) {
            self.repo.lock_remaneio(&mut *tx).await?;
        }

        let pedido = self
            .repo
            .update_fields(&mut *tx, pedido_id, &alteracao, usuario_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Pedido {}", pedido_id)))?;

        tx.commit().await?;

        tracing::info!(
            pedido_id,
            status = pedido.status.as_str(),
            ordem_remaneio = ?pedido.ordem_remaneio,
            "Status do pedido alterado"
        );
        Ok(pedido)
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn get(&self, pedido_id: i32) -> Result<PedidoDetalhe, AppError> {
        let mut conn = self.pool.acquire().await?;

        self.repo
            .find_with_itens(&mut conn, pedido_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Pedido {}", pedido_id)))
    }

    pub async fn list(&self) -> Result<Vec<PedidoDetalhe>, AppError> {
        let mut conn = self.pool.acquire().await?;
        self.repo.list_pedidos(&mut conn, &FiltroPedidos::default()).await
    }

    pub async fn list_page(&self, consulta: &ConsultaPaginada) -> Result<PaginaPedidos, AppError> {
        let (filtro, pagina, limite) = parse_consulta(consulta)?;

        let mut conn = self.pool.acquire().await?;
        let total = self.repo.count_pedidos(&mut *conn, &filtro).await?;
        let dados = self.repo.list_pedidos(&mut conn, &filtro).await?;

        Ok(PaginaPedidos { dados, total, pagina, limite })
    }

    // --- helpers ---

    async fn ensure_produtos(
        &self,
        conn: &mut PgConnection,
        itens: &[NovoItem],
    ) -> Result<(), AppError> {
        let ids: Vec<i32> = itens.iter().map(|i| i.produto_id).collect();
        let faltando = self.cadastros.missing_produtos(conn, &ids).await?;

        match faltando.first() {
            Some(id) => Err(AppError::ResourceNotFound(format!("Produto {}", id))),
            None => Ok(()),
        }
    }
}

fn parse_data(raw: &str) -> Result<chrono::NaiveDate, AppError> {
    normalize_date(raw).ok_or_else(|| {
        AppError::InvalidInput(format!("Data inválida '{}'. Use o formato YYYY-MM-DD.", raw))
    })
}

fn parse_status(raw: &str) -> Result<StatusPedido, AppError> {
    normalize_status(raw).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Status inválido '{}'. Use EM_ESPERA, CONFERIR, EFETIVADO ou CANCELADO.",
            raw
        ))
    })
}

/// Valida e normaliza os itens, calculando o total de cada linha.
pub(crate) fn prepare_itens(itens: &[ItemEntrada]) -> Result<Vec<NovoItem>, AppError> {
    itens
        .iter()
        .enumerate()
        .map(|(pos, item)| {
            item.validate()?;

            let quantidade = normalize_quantity(item.quantidade).ok_or_else(|| {
                AppError::InvalidInput(format!("Item {}: quantidade deve ser maior que zero.", pos + 1))
            })?;
            let valor_unitario = normalize_money(item.valor_unitario).ok_or_else(|| {
                AppError::InvalidInput(format!("Item {}: valor_unitario não pode ser negativo.", pos + 1))
            })?;
            let comissao = normalize_money(item.comissao.unwrap_or(Decimal::ZERO)).ok_or_else(|| {
                AppError::InvalidInput(format!("Item {}: comissao não pode ser negativa.", pos + 1))
            })?;
            let embalagem = item
                .embalagem
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string);

            Ok(NovoItem {
                produto_id: item.produto_id,
                quantidade,
                embalagem,
                valor_unitario,
                valor_total_item: line_total(quantidade, valor_unitario),
                comissao,
            })
        })
        .collect()
}

/// Chave legível do pedido: código do cliente (ou id) + timestamp em base 36.
pub(crate) fn generate_order_key(codigo: Option<&str>, cliente_id: i32, millis: i64) -> String {
    let prefixo = codigo
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| cliente_id.to_string());

    format!("{}-{}", prefixo, to_base36(millis.unsigned_abs()))
}

fn to_base36(mut n: u64) -> String {
    const DIGITOS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITOS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

fn parse_consulta(consulta: &ConsultaPaginada) -> Result<(FiltroPedidos, i64, i64), AppError> {
    let pagina = consulta.pagina.unwrap_or(1);
    if pagina < 1 {
        return Err(AppError::InvalidInput("pagina deve ser maior ou igual a 1.".into()));
    }
    let limite = consulta.limite.unwrap_or(LIMITE_PADRAO);
    if !(1..=LIMITE_MAXIMO).contains(&limite) {
        return Err(AppError::InvalidInput(format!(
            "limite deve estar entre 1 e {}.",
            LIMITE_MAXIMO
        )));
    }

    let offset = (pagina - 1)
        .checked_mul(limite)
        .ok_or_else(|| AppError::InvalidInput("pagina fora do intervalo.".into()))?;

    let filtro = FiltroPedidos {
        status: consulta.status.as_deref().map(parse_status).transpose()?,
        cliente_id: consulta.cliente_id,
        rota_id: consulta.rota_id,
        data_inicio: consulta.data_inicio.as_deref().map(parse_data).transpose()?,
        data_fim: consulta.data_fim.as_deref().map(parse_data).transpose()?,
        limite: Some(limite),
        offset,
    };

    Ok((filtro, pagina, limite))
}
