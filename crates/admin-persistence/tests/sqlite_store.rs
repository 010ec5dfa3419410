mod support;

use admin_core::backfill::EncodedUpdate;
use admin_core::{column, IndexDef, SchemaStore, SeedRow, StoreError, TableDef};
use admin_persistence::{build_pool, DbConfig, PersistenceError};
use support::{exec, text_column, TempDb};

const SECTION_ORDER: TableDef = TableDef { name: "section_order",
                                           columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                      column("section_id", "TEXT UNIQUE NOT NULL"),
                                                      column("sort_order", "INTEGER DEFAULT 0")],
                                           constraints: &[] };

#[test]
fn existence_checks_follow_ddl() {
    let db = TempDb::new();
    let store = db.store();
    assert!(!store.table_exists("section_order").unwrap());

    store.create_table(&SECTION_ORDER).unwrap();
    assert!(store.table_exists("section_order").unwrap());
    assert!(store.column_exists("section_order", "section_id").unwrap());
    assert!(!store.column_exists("section_order", "is_visible").unwrap());

    store.add_column("section_order", &column("is_visible", "INTEGER DEFAULT 1")).unwrap();
    assert!(store.column_exists("section_order", "is_visible").unwrap());

    let idx = IndexDef { name: "idx_section_order_sort", table: "section_order", columns: &["sort_order"], unique: false };
    store.create_index(&idx).unwrap();
    assert!(store.index_exists("idx_section_order_sort").unwrap());

    let snap = store.snapshot().unwrap();
    assert_eq!(snap.tables.keys().collect::<Vec<_>>(), vec!["section_order"]);
    assert!(snap.has_column("section_order", "is_visible"));
    assert!(snap.indexes.contains("idx_section_order_sort"));
    // índices internos de UNIQUE no cuentan
    assert_eq!(snap.indexes.len(), 1);
}

#[test]
fn repeated_ddl_is_rejected_not_unavailable() {
    let db = TempDb::new();
    let store = db.store();
    store.create_table(&SECTION_ORDER).unwrap();
    assert!(matches!(store.create_table(&SECTION_ORDER), Err(StoreError::Rejected(_))));
    assert!(matches!(store.add_column("section_order", &column("sort_order", "INTEGER")),
                     Err(StoreError::Rejected(_))));
}

#[test]
fn insert_rows_ignores_existing_keys() {
    let db = TempDb::new();
    let store = db.store();
    store.create_table(&SECTION_ORDER).unwrap();
    let rows = vec![SeedRow::new().text("section_id", "hero").int("sort_order", 0),
                    SeedRow::new().text("section_id", "faq").int("sort_order", 1)];
    assert_eq!(store.insert_rows("section_order", &rows).unwrap(), 2);
    assert_eq!(store.insert_rows("section_order", &rows).unwrap(), 0);
    assert_eq!(store.count_rows("section_order").unwrap(), 2);
}

#[test]
fn update_encoded_is_compare_and_set() {
    let db = TempDb::new();
    let store = db.store();
    const USERS: TableDef = TableDef { name: "users",
                                       columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                  column("permissions", "TEXT NOT NULL DEFAULT '[]'")],
                                       constraints: &[] };
    store.create_table(&USERS).unwrap();
    exec(&store, r#"INSERT INTO users (id, permissions) VALUES (1, '["crm"]'), (2, '["stats"]')"#);

    let rows = store.load_encoded("users", "id", "permissions", None).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].value.as_deref(), Some(r#"["crm"]"#));

    // un operador edita la fila 2 entre la lectura y la escritura
    exec(&store, r#"UPDATE users SET permissions = '["orders"]' WHERE id = 2"#);
    let updates = vec![EncodedUpdate { key: 1, old: r#"["crm"]"#.into(), new: r#"["leads"]"#.into() },
                       EncodedUpdate { key: 2, old: r#"["stats"]"#.into(), new: r#"["analytics"]"#.into() }];
    assert_eq!(store.update_encoded("users", "id", "permissions", &updates).unwrap(), 1);
    assert_eq!(text_column(&store, "SELECT permissions AS value FROM users ORDER BY id"),
               vec![r#"["leads"]"#.to_string(), r#"["orders"]"#.to_string()]);
}

#[test]
fn unreachable_file_is_unavailable() {
    let mut cfg = DbConfig::new("/nonexistent-dir/for/sure/admin.db");
    cfg.busy_timeout_ms = 100;
    let err = build_pool(&cfg).err().expect("pool must fail");
    assert!(matches!(err, PersistenceError::TransientIo(_)));
    let store_err: StoreError = err.into();
    assert!(matches!(store_err, StoreError::Unavailable(_)));
}
