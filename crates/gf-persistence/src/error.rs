//! Errores de persistencia.
//! Mapea errores de Diesel / conexión a variantes semánticas y, hacia el
//! core, a `StoreError`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use gf_core::errors::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("not found")]
    NotFound,
    #[error("serialization conflict (retryable)")]
    SerializationConflict,
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("invalid stored value: {0}")]
    Decode(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(info.message().to_string()),
                DatabaseErrorKind::CheckViolation => Self::CheckViolation(info.message().to_string()),
                DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(info.message().to_string()),
                DatabaseErrorKind::SerializationFailure => Self::SerializationConflict,
                other => Self::Unknown(format!("db error kind {:?}: {}", other, info.message())),
            },
            DieselError::DeserializationError(e) => Self::Decode(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            DieselError::RollbackErrorOnCommit { rollback_error, commit_error } => {
                Self::Unknown(format!("rollback={rollback_error}; commit={commit_error}"))
            }
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("json: {err}"))
    }
}

/// Traducción hacia los errores del core. Las violaciones de FK sólo pueden
/// venir de insertar un flow en un grupo inexistente.
impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::UniqueViolation(m) => StoreError::Conflict(m),
            PersistenceError::ForeignKeyViolation(m) => StoreError::NotFound(m),
            PersistenceError::NotFound => StoreError::NotFound("row not found".into()),
            PersistenceError::Decode(m) => StoreError::Serialization(m),
            other => StoreError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_store_errors() {
        assert!(matches!(StoreError::from(PersistenceError::UniqueViolation("x".into())), StoreError::Conflict(_)));
        assert!(matches!(StoreError::from(PersistenceError::ForeignKeyViolation("x".into())),
                         StoreError::NotFound(_)));
        assert!(matches!(StoreError::from(PersistenceError::NotFound), StoreError::NotFound(_)));
        assert!(matches!(StoreError::from(PersistenceError::TransientIo("pool".into())), StoreError::Storage(_)));
        assert!(matches!(StoreError::from(PersistenceError::Decode("bad".into())), StoreError::Serialization(_)));
    }

    #[test]
    fn diesel_not_found_is_semantic() {
        assert!(matches!(PersistenceError::from(DieselError::NotFound), PersistenceError::NotFound));
    }
}
