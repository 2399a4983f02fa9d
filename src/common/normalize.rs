// src/common/normalize.rs

// Funções puras de normalização usadas na borda da API.
// Nenhuma delas entra em pânico: entradas inválidas viram `None`
// e o chamador decide qual erro devolver.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::pedido::StatusPedido;

/// Casas decimais de valores monetários e quantidades.
pub const CASAS_MONETARIAS: u32 = 2;
pub const CASAS_QUANTIDADE: u32 = 3;

/// Canoniza um status vindo do cliente.
///
/// Remove espaços nas pontas, coloca em maiúsculas e troca qualquer sequência
/// de espaços internos por `_`. O token legado `OK` vira `EFETIVADO`.
pub fn normalize_status(input: &str) -> Option<StatusPedido> {
    let token = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase();

    match token.as_str() {
        "EM_ESPERA" => Some(StatusPedido::EmEspera),
        "CONFERIR" => Some(StatusPedido::Conferir),
        "EFETIVADO" | "OK" => Some(StatusPedido::Efetivado),
        "CANCELADO" => Some(StatusPedido::Cancelado),
        _ => None,
    }
}

/// Aceita somente `YYYY-MM-DD` (dez caracteres, zeros à esquerda obrigatórios).
pub fn normalize_date(input: &str) -> Option<NaiveDate> {
    let raw = input.trim();
    let bytes = raw.as_bytes();

    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Valor monetário: nunca negativo, sempre com duas casas.
pub fn normalize_money(value: Decimal) -> Option<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    Some(value.round_dp_with_strategy(CASAS_MONETARIAS, RoundingStrategy::MidpointAwayFromZero))
}

/// Quantidade de um item: estritamente positiva depois do arredondamento.
pub fn normalize_quantity(value: Decimal) -> Option<Decimal> {
    let rounded =
        value.round_dp_with_strategy(CASAS_QUANTIDADE, RoundingStrategy::MidpointAwayFromZero);
    if rounded > Decimal::ZERO { Some(rounded) } else { None }
}

/// Total de uma linha (quantidade x preço unitário), já com duas casas.
pub fn line_total(quantidade: Decimal, valor_unitario: Decimal) -> Decimal {
    (quantidade * valor_unitario)
        .round_dp_with_strategy(CASAS_MONETARIAS, RoundingStrategy::MidpointAwayFromZero)
}

/// Perfil de usuário em minúsculas; vazio conta como ausente.
pub fn normalize_profile(input: &str) -> Option<String> {
    let perfil = input.trim().to_lowercase();
    if perfil.is_empty() { None } else { Some(perfil) }
}

/// URL de imagem aceita apenas http(s) absoluto ou caminho relativo ao servidor.
pub fn normalize_image_url(input: &str) -> Option<String> {
    let url = input.trim();
    if url.is_empty() || url.chars().any(char::is_whitespace) {
        return None;
    }

    let lower = url.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || url.starts_with('/') {
        Some(url.to_string())
    } else {
        None
    }
}
