//! Errores del motor de esquema.
//!
//! Dos niveles:
//! - `StoreError`: lo que reporta un backend de almacenamiento (sin
//!   interpretación).
//! - `SchemaError`: la taxonomía del motor. Sólo dos clases son fatales
//!   (`TransientStoreUnavailable`, `MalformedOperation`); "ya existe" es un
//!   resultado, no un error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Falla cruda reportada por un `SchemaStore`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    /// Conectividad, pool agotado, lock que no se liberó a tiempo.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// El store rechazó la sentencia.
    #[error("statement rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SchemaError {
    /// Reintentable por la siguiente llamada en frío; nunca dentro de la misma.
    #[error("store unavailable during `{operation}`: {reason}")]
    TransientStoreUnavailable { operation: String, reason: String },
    /// Defecto de despliegue: la operación no puede aplicarse tal como está escrita.
    #[error("malformed operation `{operation}`: {reason}")]
    MalformedOperation { operation: String, reason: String },
}

impl SchemaError {
    /// Traduce un `StoreError` en el contexto de la operación `operation`.
    pub fn from_store(operation: &str, err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => Self::TransientStoreUnavailable { operation: operation.to_string(),
                                                                                 reason },
            StoreError::Rejected(reason) => Self::MalformedOperation { operation: operation.to_string(),
                                                                       reason },
        }
    }

    pub fn malformed(operation: &str, reason: impl Into<String>) -> Self {
        Self::MalformedOperation { operation: operation.to_string(),
                                   reason: reason.into() }
    }

    /// `true` si la próxima llamada en frío puede tener éxito sin cambiar el código.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientStoreUnavailable { .. })
    }
}

/// Fila que un backfill no pudo decodificar (o re-codificar). Se omite y se
/// registra; nunca aborta el lote.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[error("row {key}: {reason}")]
pub struct BackfillRowDecodeError {
    pub key: i64,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_maps_to_transient() {
        let err = SchemaError::from_store("add users.permissions", StoreError::Unavailable("pool timeout".into()));
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "store unavailable during `add users.permissions`: pool timeout");
    }

    #[test]
    fn rejected_maps_to_malformed() {
        let err = SchemaError::from_store("create idx", StoreError::Rejected("no such table: ghosts".into()));
        assert!(!err.is_transient());
        assert!(matches!(err, SchemaError::MalformedOperation { ref operation, .. } if operation == "create idx"));
    }

    #[test]
    fn row_error_format() {
        let err = BackfillRowDecodeError { key: 7, reason: "expected array".into() };
        assert_eq!(err.to_string(), "row 7: expected array");
    }
}
