// src/common/extract.rs

use axum::extract::{
    rejection::{JsonRejection, PathRejection},
    FromRequest, FromRequestParts,
};

use super::error::AppError;

/// `Json` que rejeita corpos malformados ou incompletos com 400
/// no formato de erro da aplicação (o padrão do axum seria 422).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(format!("Corpo da requisição inválido: {}", rejection.body_text()))
    }
}

/// `Path` com a mesma resposta de erro do resto da API (`/pedidos/abc` vira 400 em JSON).
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(format!("Parâmetro de rota inválido: {}", rejection.body_text()))
    }
}

/// Distingue campo ausente (`None`) de `null` explícito (`Some(None)`).
/// Usar junto com `#[serde(default)]`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Parcial {
        #[serde(default, deserialize_with = "deserialize_some")]
        rota_id: Option<Option<i32>>,
    }

    #[test]
    fn ausente_null_e_valor_sao_diferentes() {
        let ausente: Parcial = serde_json::from_str("{}").unwrap();
        assert_eq!(ausente.rota_id, None);

        let nulo: Parcial = serde_json::from_str(r#"{"rota_id": null}"#).unwrap();
        assert_eq!(nulo.rota_id, Some(None));

        let valor: Parcial = serde_json::from_str(r#"{"rota_id": 3}"#).unwrap();
        assert_eq!(valor.rota_id, Some(Some(3)));
    }
}
