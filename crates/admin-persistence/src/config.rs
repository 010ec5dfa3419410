//! Carga de configuración de conexión desde variables de entorno.
//! Usa convención `DATABASE_URL` (ruta del archivo SQLite) y parámetros
//! opcionales de pool.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    /// Espera máxima por el lock del archivo antes de reportar "store no disponible".
    pub busy_timeout_ms: u32,
}

impl DbConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;
    pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(),
               max_connections: Self::DEFAULT_MAX_CONNECTIONS,
               busy_timeout_ms: Self::DEFAULT_BUSY_TIMEOUT_MS }
    }

    pub fn from_env() -> Result<Self, PersistenceError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        let url = env::var("DATABASE_URL").map_err(|_| PersistenceError::Config("DATABASE_URL no definido".into()))?;
        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS").unwrap_or(Self::DEFAULT_MAX_CONNECTIONS);
        let busy_timeout_ms = parse_var("DATABASE_BUSY_TIMEOUT_MS").unwrap_or(Self::DEFAULT_BUSY_TIMEOUT_MS);
        Ok(Self { url, max_connections, busy_timeout_ms })
    }
}

fn parse_var(name: &str) -> Option<u32> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
