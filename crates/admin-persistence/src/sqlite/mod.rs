//! Backend SQLite (Diesel) del store relacional.
//!
//! - Pool r2d2 con PRAGMAs por conexión: `busy_timeout` primero, para que las
//!   demás esperen el lock del archivo en lugar de fallar en el acto.
//! - `ConnectionProvider` aísla el origen de las conexiones (pool real en
//!   producción, pools de archivos temporales en tests).
//! - `SqliteSchemaStore` implementa `admin_core::SchemaStore`.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::SqliteConnection;
use log::debug;

use crate::config::DbConfig;
use crate::error::PersistenceError;

mod store;

pub use store::SqliteSchemaStore;

/// Alias de tipo para el pool r2d2 de conexiones SQLite.
pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type SqlitePooledConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Contrato: devuelve una conexión lista o `PersistenceError::TransientIo`.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<SqlitePooledConnection, PersistenceError>;
}

/// Implementación de `ConnectionProvider` respaldada por un `SqlitePool`.
pub struct PoolProvider {
    pub pool: SqlitePool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<SqlitePooledConnection, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// PRAGMAs aplicados a cada conexión al salir del pool por primera vez.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!("PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;",
                                    self.busy_timeout_ms))
            .map_err(r2d2::Error::QueryError)
    }
}

/// Construye un pool sobre el archivo de `cfg.url`.
///
/// No aplica el esquema: eso es trabajo de `InitGate` en la primera unidad de
/// trabajo.
pub fn build_pool(cfg: &DbConfig) -> Result<SqlitePool, PersistenceError> {
    let max_size = if cfg.max_connections == 0 { 1 } else { cfg.max_connections };
    let manager = ConnectionManager::<SqliteConnection>::new(cfg.url.as_str());
    let wait = Duration::from_millis(u64::from(cfg.busy_timeout_ms)) + Duration::from_secs(1);
    let pool = r2d2::Pool::builder().max_size(max_size)
                                    .min_idle(Some(1))
                                    .connection_timeout(wait)
                                    .connection_customizer(Box::new(SqlitePragmas { busy_timeout_ms: cfg.busy_timeout_ms }))
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    debug!("sqlite pool ready url={} max_size={}", cfg.url, max_size);
    Ok(pool)
}

/// Helper de desarrollo: carga `.env`, lee `DbConfig` y construye el pool.
pub fn build_dev_pool_from_env() -> Result<SqlitePool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = DbConfig::from_env()?;
    build_pool(&cfg)
}
