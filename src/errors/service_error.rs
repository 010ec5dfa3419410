use admin_core::SchemaError;
use admin_persistence::PersistenceError;
use thiserror::Error;

/// Error que recibe una unidad de trabajo.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// El esquema no pudo confirmarse en este intento; el detalle queda en el
    /// log. La próxima solicitud vuelve a intentar.
    #[error("Servicio no disponible")]
    ServiceUnavailable,
    #[error("Error del handler: {0}")]
    Handler(String),
    #[error("Error de configuración: {0}")]
    Config(String),
}

impl From<PersistenceError> for ServiceError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Config(msg) => Self::Config(msg),
            _ => Self::ServiceUnavailable,
        }
    }
}

impl From<SchemaError> for ServiceError {
    fn from(_: SchemaError) -> Self {
        Self::ServiceUnavailable
    }
}
