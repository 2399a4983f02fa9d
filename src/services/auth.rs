// src/services/auth.rs

// Os tokens são emitidos pelo serviço de login (fora deste backend).
// Aqui só validamos a assinatura e extraímos o principal para a auditoria.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::{error::AppError, normalize::normalize_profile},
    models::auth::{Claims, Principal},
};

#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!("Token rejeitado: {}", e);
            AppError::InvalidToken
        })?;

        let usuario_id = token_data
            .claims
            .sub
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(AppError::InvalidToken)?;

        Ok(Principal {
            usuario_id,
            perfil: token_data.claims.perfil.as_deref().and_then(normalize_profile),
        })
    }

    /// Emite um token compatível com o do serviço de login.
    /// Usado por ferramentas internas e pelos testes de integração.
    pub fn create_token(
        &self,
        usuario_id: i32,
        perfil: Option<&str>,
        validade: chrono::Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + validade;

        let claims = Claims {
            sub: usuario_id.to_string(),
            perfil: perfil.map(str::to_string),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| AppError::InternalServerError(e.into()))
    }
}
