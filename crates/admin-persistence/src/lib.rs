//! admin-persistence
//!
//! Store relacional del backend de administración: SQLite vía Diesel con pool
//! r2d2, más el catálogo (esquema canónico, migraciones y seeds) que el motor
//! de `admin-core` mantiene al día.
//!
//! Módulos:
//! - `sqlite`: pool, proveedor de conexiones e implementación de `SchemaStore`.
//! - `catalog`: tablas, operaciones y reglas seed del backend.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel del catálogo interno de SQLite.

pub mod catalog;
pub mod config;
pub mod error;
pub mod schema;
pub mod sqlite;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use sqlite::{build_dev_pool_from_env, build_pool, ConnectionProvider, PoolProvider, SqlitePool, SqliteSchemaStore};
