// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{CadastroRepository, PedidoRepository, TrocaRepository},
    services::{AuthService, PedidoService, RemaneioService, TrocaService},
};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    /// Fora de produção as respostas 500 trazem o detalhe do erro.
    pub diagnostico: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v.parse().context("DB_MAX_CONNECTIONS deve ser um número")?,
            Err(_) => 5,
        };
        let db_acquire_timeout = match env::var("DB_ACQUIRE_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(v.parse().context("DB_ACQUIRE_TIMEOUT_SECS deve ser um número")?),
            Err(_) => Duration::from_secs(3),
        };

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            db_acquire_timeout,
            diagnostico: !app_env.trim().eq_ignore_ascii_case("production"),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub pedido_service: PedidoService,
    pub remaneio_service: RemaneioService,
    pub troca_service: TrocaService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    /// Monta o gráfico de dependências sobre um pool já aberto.
    pub fn from_pool(db_pool: PgPool, config: &Config) -> Self {
        let troca_repo = TrocaRepository::new();
        let pedido_repo = PedidoRepository::new(troca_repo.clone());
        let cadastro_repo = CadastroRepository::new();

        let auth_service = AuthService::new(config.jwt_secret.clone());
        let pedido_service =
            PedidoService::new(db_pool.clone(), pedido_repo.clone(), cadastro_repo.clone());
        let remaneio_service = RemaneioService::new(db_pool.clone(), pedido_repo.clone());
        let troca_service =
            TrocaService::new(db_pool.clone(), troca_repo, pedido_repo, cadastro_repo);

        Self {
            db_pool,
            auth_service,
            pedido_service,
            remaneio_service,
            troca_service,
        }
    }
}
