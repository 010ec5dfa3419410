use std::collections::{BTreeMap, BTreeSet};

use admin_core::backfill::{EncodedRow, EncodedUpdate, RowFilter};
use admin_core::{ColumnDef, IndexDef, SchemaSnapshot, SchemaStore, SeedRow, SeedValue, StoreError, TableDef};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text};
use diesel::sqlite::Sqlite;
use log::debug;

use super::{ConnectionProvider, PoolProvider, SqlitePool};
use crate::error::PersistenceError;
use crate::schema::sqlite_master;

#[derive(QueryableByName, Debug)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName, Debug)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName, Debug)]
struct EncodedRowRaw {
    #[diesel(sql_type = BigInt)]
    encoded_key: i64,
    #[diesel(sql_type = Nullable<Text>)]
    encoded_value: Option<String>,
}

/// Identificador entre comillas dobles. Los nombres ya vienen validados como
/// `[a-z_][a-z0-9_]*`.
fn quote(ident: &str) -> String {
    format!("\"{ident}\"")
}

fn load_encoded_sql(table: &str, key_column: &str, column: &str, filter_column: Option<&str>) -> String {
    let filter = filter_column.map(|c| format!(" WHERE {} = ?", quote(c))).unwrap_or_default();
    format!("SELECT {key} AS encoded_key, {col} AS encoded_value FROM {}{filter} ORDER BY {key}",
            quote(table),
            key = quote(key_column),
            col = quote(column))
}

fn create_table_sql(table: &TableDef) -> String {
    let body = table.columns
                    .iter()
                    .map(|c| format!("{} {}", quote(c.name), c.definition))
                    .chain(table.constraints.iter().map(|c| c.to_string()))
                    .collect::<Vec<_>>()
                    .join(", ");
    format!("CREATE TABLE {} ({body})", quote(table.name))
}

fn add_column_sql(table: &str, column: &ColumnDef) -> String {
    format!("ALTER TABLE {} ADD COLUMN {} {}", quote(table), quote(column.name), column.definition)
}

fn create_index_sql(index: &IndexDef) -> String {
    let cols = index.columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ");
    format!("CREATE {}INDEX {} ON {} ({cols})",
            if index.unique { "UNIQUE " } else { "" },
            quote(index.name),
            quote(index.table))
}

fn insert_sql(table: &str, row: &SeedRow) -> String {
    let cols = row.columns().map(quote).collect::<Vec<_>>().join(", ");
    let params = vec!["?"; row.values().len()].join(", ");
    format!("INSERT OR IGNORE INTO {} ({cols}) VALUES ({params})", quote(table))
}

/// `SchemaStore` sobre un archivo SQLite.
///
/// DDL sin `IF NOT EXISTS`: si otra instancia ganó la carrera, la sentencia
/// falla y el motor re-sondea el catálogo para clasificarla.
pub struct SqliteSchemaStore<P: ConnectionProvider = PoolProvider> {
    provider: P,
}

impl SqliteSchemaStore<PoolProvider> {
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { provider: PoolProvider { pool } }
    }
}

impl<P: ConnectionProvider> SqliteSchemaStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn with_conn<T>(&self,
                    f: impl FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError>)
                    -> Result<T, StoreError> {
        let mut conn = self.provider.connection()?;
        f(&mut conn).map_err(StoreError::from)
    }

    fn execute_ddl(&self, sql: String) -> Result<(), StoreError> {
        debug!("ddl: {sql}");
        self.with_conn(|conn| {
                diesel::sql_query(sql).execute(conn)?;
                Ok(())
            })
    }

    fn master_count(&self, kind: &str, object: &str) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
                let n: i64 = sqlite_master::table.filter(sqlite_master::kind.eq(kind))
                                                 .filter(sqlite_master::name.eq(object))
                                                 .count()
                                                 .get_result(conn)?;
                Ok(n > 0)
            })
    }
}

fn table_columns(conn: &mut SqliteConnection, table: &str) -> Result<Vec<String>, PersistenceError> {
    let rows: Vec<NameRow> = diesel::sql_query("SELECT name FROM pragma_table_info(?)").bind::<Text, _>(table)
                                                                                       .load(conn)?;
    Ok(rows.into_iter().map(|r| r.name).collect())
}

impl<P: ConnectionProvider> SchemaStore for SqliteSchemaStore<P> {
    fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        self.master_count("table", table)
    }

    fn column_exists(&self, table: &str, column: &str) -> Result<bool, StoreError> {
        self.with_conn(|conn| Ok(table_columns(conn, table)?.iter().any(|c| c == column)))
    }

    fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        self.master_count("index", index)
    }

    fn create_table(&self, table: &TableDef) -> Result<(), StoreError> {
        self.execute_ddl(create_table_sql(table))
    }

    fn add_column(&self, table: &str, column: &ColumnDef) -> Result<(), StoreError> {
        self.execute_ddl(add_column_sql(table, column))
    }

    fn create_index(&self, index: &IndexDef) -> Result<(), StoreError> {
        self.execute_ddl(create_index_sql(index))
    }

    fn count_rows(&self, table: &str) -> Result<u64, StoreError> {
        self.with_conn(|conn| {
                let row: CountRow = diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {}", quote(table))).get_result(conn)?;
                Ok(u64::try_from(row.count).unwrap_or(0))
            })
    }

    fn insert_rows(&self, table: &str, rows: &[SeedRow]) -> Result<usize, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }
        self.with_conn(|conn| {
                conn.immediate_transaction(|conn| {
                        let mut inserted = 0;
                        for row in rows {
                            let mut query = diesel::sql_query(insert_sql(table, row)).into_boxed::<Sqlite>();
                            for (_, value) in row.values() {
                                query = match value {
                                    SeedValue::Text(s) => query.bind::<Text, _>(s.clone()),
                                    SeedValue::Integer(i) => query.bind::<BigInt, _>(*i),
                                    SeedValue::Null => query.bind::<Nullable<Text>, _>(None::<String>),
                                };
                            }
                            inserted += query.execute(conn)?;
                        }
                        Ok::<_, PersistenceError>(inserted)
                    })
            })
    }

    fn load_encoded(&self,
                    table: &str,
                    key_column: &str,
                    column: &str,
                    only_where: Option<&RowFilter>)
                    -> Result<Vec<EncodedRow>, StoreError> {
        let sql = load_encoded_sql(table, key_column, column, only_where.map(|f| f.column));
        self.with_conn(|conn| {
                let mut query = diesel::sql_query(sql).into_boxed::<Sqlite>();
                if let Some(f) = only_where {
                    query = query.bind::<Text, _>(f.equals);
                }
                let rows: Vec<EncodedRowRaw> = query.load(conn)?;
                Ok(rows.into_iter()
                       .map(|r| EncodedRow { key: r.encoded_key, value: r.encoded_value })
                       .collect())
            })
    }

    fn update_encoded(&self,
                      table: &str,
                      key_column: &str,
                      column: &str,
                      updates: &[EncodedUpdate])
                      -> Result<usize, StoreError> {
        if updates.is_empty() {
            return Ok(0);
        }
        // compare-and-set: sólo escribe si la celda sigue como se leyó
        let sql = format!("UPDATE {} SET {col} = ? WHERE {} = ? AND {col} = ?",
                          quote(table),
                          quote(key_column),
                          col = quote(column));
        self.with_conn(|conn| {
                conn.immediate_transaction(|conn| {
                        let mut changed = 0;
                        for u in updates {
                            changed += diesel::sql_query(sql.as_str()).bind::<Text, _>(&u.new)
                                                                      .bind::<BigInt, _>(u.key)
                                                                      .bind::<Text, _>(&u.old)
                                                                      .execute(conn)?;
                        }
                        Ok::<_, PersistenceError>(changed)
                    })
            })
    }

    fn snapshot(&self) -> Result<SchemaSnapshot, StoreError> {
        self.with_conn(|conn| {
                let names: Vec<String> = sqlite_master::table.filter(sqlite_master::kind.eq("table"))
                                                             .filter(sqlite_master::name.not_like("sqlite_%"))
                                                             .select(sqlite_master::name)
                                                             .order(sqlite_master::name)
                                                             .load(conn)?;
                let mut tables = BTreeMap::new();
                for name in names {
                    let cols: BTreeSet<String> = table_columns(conn, &name)?.into_iter().collect();
                    tables.insert(name, cols);
                }
                let indexes: BTreeSet<String> =
                    sqlite_master::table.filter(sqlite_master::kind.eq("index"))
                                        .filter(sqlite_master::name.not_like("sqlite_%"))
                                        .select(sqlite_master::name)
                                        .load::<String>(conn)?
                                        .into_iter()
                                        .collect();
                Ok(SchemaSnapshot { tables, indexes })
            })
    }
}

#[cfg(test)]
mod tests {
    use admin_core::column;

    use super::*;

    const TABS: TableDef = TableDef { name: "calculator_services",
                                      columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                 column("tab_id", "INTEGER NOT NULL")],
                                      constraints: &["FOREIGN KEY (tab_id) REFERENCES calculator_tabs(id) ON DELETE CASCADE"] };

    #[test]
    fn renders_create_table_with_constraints() {
        assert_eq!(create_table_sql(&TABS),
                   "CREATE TABLE \"calculator_services\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \"tab_id\" INTEGER NOT \
                    NULL, FOREIGN KEY (tab_id) REFERENCES calculator_tabs(id) ON DELETE CASCADE)");
    }

    #[test]
    fn renders_index_and_column() {
        let idx = IndexDef { name: "idx_leads_status", table: "leads", columns: &["status"], unique: false };
        assert_eq!(create_index_sql(&idx), "CREATE INDEX \"idx_leads_status\" ON \"leads\" (\"status\")");
        let unique = IndexDef { unique: true, ..idx };
        assert!(create_index_sql(&unique).starts_with("CREATE UNIQUE INDEX"));
        assert_eq!(add_column_sql("slot_counter", &column("position", "TEXT DEFAULT 'after-hero'")),
                   "ALTER TABLE \"slot_counter\" ADD COLUMN \"position\" TEXT DEFAULT 'after-hero'");
    }

    #[test]
    fn insert_ignores_conflicts() {
        let row = SeedRow::new().text("section_id", "hero").int("sort_order", 0);
        assert_eq!(insert_sql("section_order", &row),
                   "INSERT OR IGNORE INTO \"section_order\" (\"section_id\", \"sort_order\") VALUES (?, ?)");
    }

    #[test]
    fn filtered_load_binds_the_value() {
        assert_eq!(load_encoded_sql("users", "id", "role", Some("username")),
                   "SELECT \"id\" AS encoded_key, \"role\" AS encoded_value FROM \"users\" WHERE \"username\" = ? ORDER BY \"id\"");
        assert!(!load_encoded_sql("users", "id", "role", None).contains("WHERE"));
    }
}
