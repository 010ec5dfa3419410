//! Errores de persistencia.
//! Mapea errores de Diesel / pool a variantes semánticas, y éstas a la
//! distinción que necesita el motor (`StoreError`).

use admin_core::StoreError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
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
    #[error("database busy: {0}")]
    Busy(String),
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

/// SQLite reporta lock/busy como error genérico; best-effort por texto, igual
/// que cualquier driver sin códigos estructurados para esto.
fn is_busy(message: &str) -> bool {
    let m = message.to_lowercase();
    m.contains("database is locked") || m.contains("database is busy") || m.contains("database table is locked")
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(info.message().to_string()),
                DatabaseErrorKind::CheckViolation => Self::CheckViolation(info.message().to_string()),
                DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(info.message().to_string()),
                DatabaseErrorKind::ClosedConnection => Self::TransientIo(info.message().to_string()),
                _ if is_busy(info.message()) => Self::Busy(info.message().to_string()),
                other => Self::Unknown(format!("db error kind {:?}: {}", other, info.message())),
            },
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            DieselError::DeserializationError(e) => Self::Unknown(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::QueryBuilderError(e) => Self::Unknown(format!("query builder: {e}")),
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl From<diesel::r2d2::PoolError> for PersistenceError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::TransientIo(format!("pool error: {err}"))
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Busy(_) | PersistenceError::TransientIo(_) | PersistenceError::Config(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Rejected(other.to_string()),
        }
    }
}
