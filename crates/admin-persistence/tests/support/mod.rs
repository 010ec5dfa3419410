//! Stores SQLite sobre archivos temporales.
#![allow(dead_code)]

use admin_persistence::{build_pool, ConnectionProvider, DbConfig, SqliteSchemaStore};
use diesel::{QueryableByName, RunQueryDsl};
use diesel::sql_types::Text;
use tempfile::TempDir;

pub struct TempDb {
    pub dir: TempDir,
    pub cfg: DbConfig,
}

impl TempDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("admin.db");
        let cfg = DbConfig::new(path.to_string_lossy().to_string());
        Self { dir, cfg }
    }

    /// Store con su propio pool: equivale a una instancia del servicio.
    pub fn store(&self) -> SqliteSchemaStore {
        SqliteSchemaStore::from_pool(build_pool(&self.cfg).expect("pool"))
    }
}

#[derive(QueryableByName)]
struct TextRow {
    #[diesel(sql_type = Text)]
    value: String,
}

/// Ejecuta SQL arbitrario fuera del motor (simula a un operador).
pub fn exec(store: &SqliteSchemaStore, sql: &str) -> usize {
    let mut conn = store.provider().connection().expect("conn");
    diesel::sql_query(sql).execute(&mut conn).expect("exec")
}

/// La consulta debe exponer una sola columna `value`.
pub fn text_column(store: &SqliteSchemaStore, sql: &str) -> Vec<String> {
    let mut conn = store.provider().connection().expect("conn");
    diesel::sql_query(sql).load::<TextRow>(&mut conn)
                          .expect("query")
                          .into_iter()
                          .map(|r| r.value)
                          .collect()
}
