// src/common/db_utils.rs

// Classificação dos erros do Postgres pelo nome da constraint violada.
// Os nomes batem com os definidos em migrations/.

use super::error::AppError;

pub(crate) fn constraint_of(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Converte violações de FK em "não encontrado" nomeando a entidade.
/// `rotulo` descreve o valor enviado (ex.: o id da rota).
pub(crate) fn map_fk_violation(err: sqlx::Error, rotulo: impl Fn(&str) -> Option<String>) -> AppError {
    if is_foreign_key_violation(&err) {
        if let Some(entidade) = constraint_of(&err).and_then(&rotulo) {
            return AppError::ResourceNotFound(entidade);
        }
    }
    err.into()
}
