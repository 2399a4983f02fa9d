// src/models/auth.rs

use serde::{Deserialize, Serialize};

// Estrutura de dados ("claims") dentro do JWT emitido pelo serviço de login
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (ID numérico do usuário, como string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perfil: Option<String>,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

/// Quem está executando a requisição. Vai para as colunas de auditoria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub usuario_id: i32,
    pub perfil: Option<String>,
}
