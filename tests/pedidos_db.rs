// Cenários ponta a ponta contra um Postgres real.
// Rodar com: DATABASE_URL=postgres://... cargo test --features db-tests
#![cfg(feature = "db-tests")]

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use pedidos_backend::{
    build_router,
    config::{AppState, Config},
};

#[derive(Clone)]
struct TestApp {
    router: Router,
    token: String,
    pool: PgPool,
}

impl TestApp {
    async fn new(pool: PgPool) -> Self {
        seed(&pool).await;

        let config = Config {
            database_url: String::new(),
            jwt_secret: "segredo-dos-testes".into(),
            bind_addr: "127.0.0.1:0".into(),
            db_max_connections: 5,
            db_acquire_timeout: Duration::from_secs(3),
            diagnostico: true,
        };
        let state = AppState::from_pool(pool.clone(), &config);
        let token = state
            .auth_service
            .create_token(7, Some("conferente"), chrono::Duration::hours(1))
            .unwrap();

        Self { router: build_router(state), token, pool }
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn criar_pedido(&self, data: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/pedidos",
                Some(json!({
                    "cliente_id": 1,
                    "data": data,
                    "itens": [{ "produto_id": 7, "quantidade": 1, "valor_unitario": "5.00" }]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }

    async fn mudar_status(&self, id: i64, status: &str) -> Value {
        let (code, body) = self
            .call(
                Method::PATCH,
                &format!("/pedidos/{}/status", id),
                Some(json!({ "status": status })),
            )
            .await;
        assert_eq!(code, StatusCode::OK, "{}", body);
        body
    }

    // id -> ordem_remaneio de todos os pedidos em CONFERIR
    async fn fila(&self) -> Vec<(i32, Option<i32>)> {
        sqlx::query_as(
            "SELECT id, ordem_remaneio FROM pedidos WHERE status = 'CONFERIR' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .unwrap()
    }
}

async fn seed(pool: &PgPool) {
    sqlx::query("INSERT INTO clientes (id, codigo, nome) VALUES (1, 'C001', 'Mercado Central'), (2, NULL, 'Padaria')")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO produtos (id, nome, imagem_url) VALUES \
         (7, 'Queijo Minas', '/img/queijo.png'), (8, 'Requeijão', 'ftp://quebrada')",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO rotas (id, nome) VALUES (1, 'Centro'), (2, 'Zona Norte')")
        .execute(pool)
        .await
        .unwrap();
}

fn id_of(pedido: &Value) -> i64 {
    pedido["id"].as_i64().unwrap()
}

// --- Cenário A ---

#[sqlx::test(migrations = "./migrations")]
async fn cria_pedido_com_total_calculado(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/pedidos",
            Some(json!({
                "cliente_id": 1,
                "data": "2024-03-01",
                "itens": [{ "produto_id": 7, "quantidade": 3, "valor_unitario": "10.00" }]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["valor_total"], "30.00");
    assert_eq!(body["status"], "EM_ESPERA");
    assert_eq!(body["ordem_remaneio"], Value::Null);
    assert_eq!(body["criado_por"], 7);
    assert!(body["chave_pedido"].as_str().unwrap().starts_with("C001-"));
    assert_eq!(body["itens"][0]["valor_total_item"], "30.00");
}

#[sqlx::test(migrations = "./migrations")]
async fn chave_usa_o_id_quando_o_cliente_nao_tem_codigo(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/pedidos",
            Some(json!({
                "cliente_id": 2,
                "data": "2024-03-01",
                "itens": [{ "produto_id": 7, "quantidade": 1, "valor_unitario": "1" }]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["chave_pedido"].as_str().unwrap().starts_with("2-"));
}

#[sqlx::test(migrations = "./migrations")]
async fn produto_inexistente_nao_deixa_pedido_pela_metade(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/pedidos",
            Some(json!({
                "cliente_id": 1,
                "data": "2024-03-01",
                "itens": [
                    { "produto_id": 7, "quantidade": 1, "valor_unitario": "1.00" },
                    { "produto_id": 99, "quantidade": 1, "valor_unitario": "1.00" }
                ]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Produto 99 não encontrado");

    let pedidos: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pedidos")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(pedidos, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn cliente_inexistente_e_404(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/pedidos",
            Some(json!({
                "cliente_id": 50,
                "data": "2024-03-01",
                "itens": [{ "produto_id": 7, "quantidade": 1, "valor_unitario": "1.00" }]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Cliente 50 não encontrado");
}

#[sqlx::test(migrations = "./migrations")]
async fn chave_duplicada_e_409(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let pedido = json!({
        "chave_pedido": "PED-1",
        "cliente_id": 1,
        "data": "2024-03-01",
        "itens": [{ "produto_id": 7, "quantidade": 1, "valor_unitario": "1.00" }]
    });

    let (primeiro, _) = app.call(Method::POST, "/pedidos", Some(pedido.clone())).await;
    assert_eq!(primeiro, StatusCode::CREATED);

    let (segundo, _) = app.call(Method::POST, "/pedidos", Some(pedido)).await;
    assert_eq!(segundo, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn criar_direto_em_conferir_entra_na_fila(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/pedidos",
            Some(json!({
                "cliente_id": 1,
                "data": "2024-03-01",
                "status": " conferir ",
                "itens": [{ "produto_id": 7, "quantidade": 1, "valor_unitario": "1.00" }]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "CONFERIR");
    assert_eq!(body["ordem_remaneio"], 1);
}

// --- Cenário B e efeitos de status ---

#[sqlx::test(migrations = "./migrations")]
async fn conferir_numera_na_ordem_das_transicoes(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let a = id_of(&app.criar_pedido("2024-03-01").await);
    let b = id_of(&app.criar_pedido("2024-03-02").await);
    let c = id_of(&app.criar_pedido("2024-03-03").await);

    assert_eq!(app.mudar_status(a, "CONFERIR").await["ordem_remaneio"], 1);
    assert_eq!(app.mudar_status(b, "CONFERIR").await["ordem_remaneio"], 2);
    assert_eq!(app.mudar_status(c, "CONFERIR").await["ordem_remaneio"], 3);

    // Reentrar em CONFERIR com posição já definida não muda nada
    assert_eq!(app.mudar_status(b, "CONFERIR").await["ordem_remaneio"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn sair_de_conferir_limpa_a_posicao(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let id = id_of(&app.criar_pedido("2024-03-01").await);

    assert_eq!(app.mudar_status(id, "CONFERIR").await["ordem_remaneio"], 1);

    let (status, body) = app
        .call(
            Method::PATCH,
            &format!("/pedidos/{}/status", id),
            Some(json!({ "status": "ok", "valor_efetivado": "4.50" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "EFETIVADO");
    assert_eq!(body["ordem_remaneio"], Value::Null);
    assert_eq!(body["valor_efetivado"], "4.50");
    assert_eq!(body["atualizado_por"], 7);
}

#[sqlx::test(migrations = "./migrations")]
async fn status_de_pedido_inexistente_e_404(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, _) = app
        .call(Method::PATCH, "/pedidos/999/status", Some(json!({ "status": "CANCELADO" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn transicoes_simultaneas_nao_repetem_posicao(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let mut ids = Vec::new();
    for _ in 0..20 {
        ids.push(id_of(&app.criar_pedido("2024-03-01").await));
    }

    let mut tarefas = tokio::task::JoinSet::new();
    for id in ids {
        let app = app.clone();
        tarefas.spawn(async move { app.mudar_status(id, "CONFERIR").await });
    }
    while let Some(resultado) = tarefas.join_next().await {
        resultado.unwrap();
    }

    let mut posicoes: Vec<i32> = app.fila().await.into_iter().map(|(_, p)| p.unwrap()).collect();
    posicoes.sort();
    assert_eq!(posicoes, (1..=20).collect::<Vec<i32>>());
}

// --- Remaneio ---

#[sqlx::test(migrations = "./migrations")]
async fn remaneio_poe_os_escolhidos_no_topo(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let mut ids = Vec::new();
    for dia in 1..=4 {
        let id = id_of(&app.criar_pedido(&format!("2024-03-0{}", dia)).await);
        app.mudar_status(id, "CONFERIR").await;
        ids.push(id);
    }
    let (p1, p2, p3, p4) = (ids[0], ids[1], ids[2], ids[3]);

    let (status, body) = app
        .call(Method::PATCH, "/pedidos/remaneio/ordem", Some(json!({ "ids": [p3, p4, p3] })))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "total": 4 }));

    let fila = app.fila().await;
    let posicao = |id: i64| fila.iter().find(|(p, _)| *p as i64 == id).unwrap().1;
    assert_eq!(posicao(p3), Some(1));
    assert_eq!(posicao(p4), Some(2));
    assert_eq!(posicao(p1), Some(3));
    assert_eq!(posicao(p2), Some(4));

    // A listagem respeita a nova fila
    let (_, lista) = app.call(Method::GET, "/pedidos", None).await;
    let ordem: Vec<i64> = lista.as_array().unwrap().iter().map(id_of).collect();
    assert_eq!(ordem, vec![p3, p4, p1, p2]);
}

// Cenário C
#[sqlx::test(migrations = "./migrations")]
async fn remaneio_com_pedido_em_espera_nao_muda_nada(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let a = id_of(&app.criar_pedido("2024-03-01").await);
    let b = id_of(&app.criar_pedido("2024-03-02").await);
    let em_espera = id_of(&app.criar_pedido("2024-03-03").await);
    app.mudar_status(a, "CONFERIR").await;
    app.mudar_status(b, "CONFERIR").await;

    let antes = app.fila().await;

    let (status, body) = app
        .call(Method::PATCH, "/pedidos/remaneio/ordem", Some(json!({ "ids": [b, em_espera] })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["invalidos"], json!([em_espera]));
    assert_eq!(app.fila().await, antes);
}

#[sqlx::test(migrations = "./migrations")]
async fn remaneio_com_id_inexistente_e_400(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, body) = app
        .call(Method::PATCH, "/pedidos/remaneio/ordem", Some(json!({ "ids": [12345] })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["invalidos"], json!([12345]));
}

// --- Atualização completa ---

#[sqlx::test(migrations = "./migrations")]
async fn substituir_itens_recalcula_o_total(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let id = id_of(&app.criar_pedido("2024-03-01").await);

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/pedidos/{}", id),
            Some(json!({
                "rota_id": 2,
                "itens": [
                    { "produto_id": 7, "quantidade": "0.5", "valor_unitario": "3.33" },
                    { "produto_id": 8, "quantidade": 2, "valor_unitario": "1.005", "embalagem": "Pote" }
                ]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["rota_id"], 2);
    assert_eq!(body["itens"].as_array().unwrap().len(), 2);
    assert_eq!(body["itens"][0]["valor_total_item"], "1.67");
    assert_eq!(body["itens"][1]["valor_unitario"], "1.01");
    assert_eq!(body["itens"][1]["valor_total_item"], "2.02");
    assert_eq!(body["valor_total"], "3.69");

    let soma: rust_decimal::Decimal = sqlx::query_scalar(
        "SELECT SUM(valor_total_item) FROM itens_pedido WHERE pedido_id = $1",
    )
    .bind(id as i32)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(soma.to_string(), "3.69");
}

#[sqlx::test(migrations = "./migrations")]
async fn rota_null_remove_a_rota_e_rota_inexistente_e_404(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let id = id_of(&app.criar_pedido("2024-03-01").await);
    let uri = format!("/pedidos/{}", id);

    let (status, body) = app.call(Method::PUT, &uri, Some(json!({ "rota_id": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rota_id"], 1);

    let (status, body) = app.call(Method::PUT, &uri, Some(json!({ "rota_id": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rota_id"], Value::Null);

    let (status, body) = app.call(Method::PUT, &uri, Some(json!({ "rota_id": 77 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Rota 77 não encontrado");
}

#[sqlx::test(migrations = "./migrations")]
async fn atualizacao_com_produto_inexistente_nao_altera_nada(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let id = id_of(&app.criar_pedido("2024-03-01").await);

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/pedidos/{}", id),
            Some(json!({
                "rota_id": 2,
                "itens": [
                    { "produto_id": 8, "quantidade": 4, "valor_unitario": "2.00" },
                    { "produto_id": 99, "quantidade": 1, "valor_unitario": "1.00" }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Produto 99 não encontrado");

    let (status, pedido) = app.call(Method::GET, &format!("/pedidos/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pedido["valor_total"], "5.00");
    assert_eq!(pedido["rota_id"], Value::Null);
    let itens = pedido["itens"].as_array().unwrap();
    assert_eq!(itens.len(), 1);
    assert_eq!(itens[0]["produto_id"], 7);
}

#[sqlx::test(migrations = "./migrations")]
async fn atualizacao_de_status_entra_e_sai_da_fila(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let uri = format!("/pedidos/{}", id_of(&app.criar_pedido("2024-03-01").await));

    let (status, body) = app.call(Method::PUT, &uri, Some(json!({ "status": "conferir" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "CONFERIR");
    assert_eq!(body["ordem_remaneio"], 1);

    let (status, body) = app.call(Method::PUT, &uri, Some(json!({ "status": "ok" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "EFETIVADO");
    assert_eq!(body["ordem_remaneio"], Value::Null);
    assert!(app.fila().await.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn atualizar_pedido_inexistente_e_404(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let (status, _) = app
        .call(Method::PUT, "/pedidos/999", Some(json!({ "data": "2024-04-01" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- Cenário D e trocas ---

#[sqlx::test(migrations = "./migrations")]
async fn substituir_itens_desvincula_as_trocas(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let pedido = app.criar_pedido("2024-03-01").await;
    let pedido_id = id_of(&pedido);
    let item_id = pedido["itens"][0]["id"].as_i64().unwrap();

    let (status, troca) = app
        .call(
            Method::POST,
            "/trocas",
            Some(json!({
                "pedido_id": pedido_id,
                "item_pedido_id": item_id,
                "produto_id": 7,
                "quantidade": 1,
                "motivo": "Vencido"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", troca);
    assert_eq!(troca["item_pedido_id"], item_id);
    let troca_id = id_of(&troca);

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/pedidos/{}", pedido_id),
            Some(json!({ "itens": [{ "produto_id": 8, "quantidade": 2, "valor_unitario": "2.00" }] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, troca) = app.call(Method::GET, &format!("/trocas/{}", troca_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(troca["item_pedido_id"], Value::Null);
    assert_eq!(troca["motivo"], "Vencido");
}

#[sqlx::test(migrations = "./migrations")]
async fn troca_valida_pedido_produto_e_item(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let pedido_id = id_of(&app.criar_pedido("2024-03-01").await);
    let outro = app.criar_pedido("2024-03-02").await;
    let item_de_outro = outro["itens"][0]["id"].as_i64().unwrap();

    let troca = |pedido: i64, produto: i64, item: Option<i64>| {
        json!({ "pedido_id": pedido, "produto_id": produto, "item_pedido_id": item, "quantidade": 1 })
    };

    let (status, body) = app.call(Method::POST, "/trocas", Some(troca(999, 7, None))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Pedido 999 não encontrado");

    let (status, body) = app.call(Method::POST, "/trocas", Some(troca(pedido_id, 99, None))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Produto 99 não encontrado");

    let (status, _) = app
        .call(Method::POST, "/trocas", Some(troca(pedido_id, 7, Some(item_de_outro))))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(Method::POST, "/trocas", Some(json!({ "pedido_id": pedido_id, "quantidade": 1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn lista_e_remove_trocas(pool: PgPool) {
    let app = TestApp::new(pool).await;
    let pedido_id = id_of(&app.criar_pedido("2024-03-01").await);

    for produto in [7, 8] {
        let (status, _) = app
            .call(
                Method::POST,
                "/trocas",
                Some(json!({ "pedido_id": pedido_id, "produto_id": produto, "quantidade": "1.5" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, lista) = app
        .call(Method::GET, &format!("/pedidos/{}/trocas", pedido_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let lista = lista.as_array().unwrap().clone();
    assert_eq!(lista.len(), 2);

    // Mais recente primeiro; URL inválida do cadastro vira null
    assert_eq!(lista[0]["produto_nome"], "Requeijão");
    assert_eq!(lista[0]["produto_imagem_url"], Value::Null);
    assert_eq!(lista[1]["produto_imagem_url"], "/img/queijo.png");

    let troca_id = id_of(&lista[0]);
    let (status, _) = app.call(Method::DELETE, &format!("/trocas/{}", troca_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.call(Method::DELETE, &format!("/trocas/{}", troca_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call(Method::GET, "/pedidos/999/trocas", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// --- Listagem paginada ---

#[sqlx::test(migrations = "./migrations")]
async fn paginado_filtra_e_conta(pool: PgPool) {
    let app = TestApp::new(pool).await;

    let a = id_of(&app.criar_pedido("2024-03-01").await);
    let b = id_of(&app.criar_pedido("2024-03-02").await);
    let c = id_of(&app.criar_pedido("2024-03-03").await);
    app.mudar_status(a, "CONFERIR").await;

    let (status, pagina) = app
        .call(Method::GET, "/pedidos/paginado?pagina=1&limite=2", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pagina["total"], 3);
    assert_eq!(pagina["pagina"], 1);
    assert_eq!(pagina["limite"], 2);
    let ids: Vec<i64> = pagina["dados"].as_array().unwrap().iter().map(id_of).collect();
    // Fila do remaneio primeiro, depois data decrescente
    assert_eq!(ids, vec![a, c]);

    let (_, pagina) = app
        .call(Method::GET, "/pedidos/paginado?pagina=2&limite=2", None)
        .await;
    let ids: Vec<i64> = pagina["dados"].as_array().unwrap().iter().map(id_of).collect();
    assert_eq!(ids, vec![b]);

    let (_, filtrada) = app
        .call(
            Method::GET,
            "/pedidos/paginado?status=em%20espera&data_inicio=2024-03-02&data_fim=2024-03-02",
            None,
        )
        .await;
    assert_eq!(filtrada["total"], 1);
    assert_eq!(id_of(&filtrada["dados"][0]), b);
    assert_eq!(filtrada["dados"][0]["itens"].as_array().unwrap().len(), 1);
}
