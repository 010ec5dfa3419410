//! Plan de prueba pequeño y envoltorios de store con fallas inyectadas.
#![allow(dead_code)]

use std::cell::Cell;

use admin_core::backfill::{EncodedRow, EncodedUpdate, Encoding, RowFilter};
use admin_core::{column, Action, BackfillRule, CanonicalSchema, ColumnDef, IndexDef, MigrationSet, Operation,
                 SchemaPlan, SchemaSnapshot, SchemaStore, SeedRow, SeedRule, StoreError, TableDef, TagSet};

pub const USERS: TableDef = TableDef { name: "users",
                                       columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                  column("username", "TEXT UNIQUE NOT NULL"),
                                                  column("role", "TEXT NOT NULL DEFAULT 'admin'")],
                                       constraints: &[] };
pub const LEADS: TableDef = TableDef { name: "leads",
                                       columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                  column("status", "TEXT DEFAULT 'new'"),
                                                  column("created_at", "DATETIME DEFAULT CURRENT_TIMESTAMP")],
                                       constraints: &[] };
pub const SECTION_ORDER: TableDef = TableDef { name: "section_order",
                                               columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                          column("section_id", "TEXT UNIQUE NOT NULL"),
                                                          column("sort_order", "INTEGER DEFAULT 0")],
                                               constraints: &[] };
pub const SLOT_COUNTER: TableDef = TableDef { name: "slot_counter",
                                              columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                         column("total_slots", "INTEGER DEFAULT 10")],
                                              constraints: &[] };
pub const ROLE_TEMPLATES: TableDef = TableDef { name: "role_templates",
                                                columns: &[column("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
                                                           column("role", "TEXT UNIQUE NOT NULL"),
                                                           column("sections", "TEXT NOT NULL DEFAULT '[]'")],
                                                constraints: &[] };

pub const PERMISSIONS: ColumnDef = column("permissions", "TEXT NOT NULL DEFAULT '[]'");
pub const ASSIGNED_TO: ColumnDef = column("assigned_to", "INTEGER");
pub const LEADS_STATUS: IndexDef = IndexDef { name: "idx_leads_status", table: "leads", columns: &["status"], unique: false };

pub fn legacy_sections(tags: &TagSet) -> TagSet {
    tags.renamed(&[("crm", "leads"), ("calc", "calculator")])
}

pub fn permissions_backfill() -> BackfillRule {
    BackfillRule { table: "users",
                   key_column: "id",
                   column: "permissions",
                   encoding: Encoding::JsonArray,
                   transform: legacy_sections,
                   only_where: None }
}

pub fn operations() -> Vec<Operation> {
    vec![Operation::new("users_permissions", "users.permissions", Action::AddColumn { table: "users", column: PERMISSIONS }),
         Operation::new("role_templates", "role templates lookup", Action::CreateTable(ROLE_TEMPLATES)),
         Operation::new("idx_leads_status", "leads by status", Action::CreateIndex(LEADS_STATUS)),
         Operation::new("users_permissions_legacy_tags", "rename legacy tags", Action::Backfill(permissions_backfill())),
         Operation::new("leads_assigned_to", "leads.assigned_to", Action::AddColumn { table: "leads", column: ASSIGNED_TO })]
}

fn section_rows() -> Vec<SeedRow> {
    vec![SeedRow::new().text("section_id", "hero").int("sort_order", 0),
         SeedRow::new().text("section_id", "faq").int("sort_order", 1)]
}

fn role_rows() -> Vec<SeedRow> {
    vec![SeedRow::new().text("role", "main_admin").text("sections", r#"["dashboard","leads"]"#),
         SeedRow::new().text("role", "operator").text("sections", r#"["dashboard"]"#)]
}

pub fn schema() -> CanonicalSchema {
    CanonicalSchema::new("slot_counter",
                         vec![Action::CreateTable(USERS),
                              Action::CreateTable(LEADS),
                              Action::CreateTable(SECTION_ORDER),
                              Action::CreateTable(SLOT_COUNTER)]).unwrap()
}

pub fn plan() -> SchemaPlan {
    SchemaPlan::new(schema(),
                    MigrationSet::new(operations()).unwrap(),
                    vec![SeedRule { table: "section_order", rows: section_rows },
                         SeedRule { table: "role_templates", rows: role_rows }]).unwrap()
}

/// Simula perder una carrera: el primer sondeo de cada elemento listado dice
/// "ausente" aunque el elemento ya exista, como si otra instancia lo hubiera
/// creado entre el sondeo y el intento.
pub struct RacingStore<'a, S> {
    pub inner: &'a S,
    pub stale_columns: Vec<(&'static str, &'static str)>,
    pub stale_tables: Vec<&'static str>,
    pub used: Cell<usize>,
}

impl<'a, S: SchemaStore> RacingStore<'a, S> {
    pub fn new(inner: &'a S) -> Self {
        Self { inner, stale_columns: Vec::new(), stale_tables: Vec::new(), used: Cell::new(0) }
    }
}

impl<S: SchemaStore> SchemaStore for RacingStore<'_, S> {
    fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        if let Some(pos) = self.stale_tables.iter().position(|t| *t == table) {
            if self.used.get() & (1 << pos) == 0 {
                self.used.set(self.used.get() | (1 << pos));
                return Ok(false);
            }
        }
        self.inner.table_exists(table)
    }
    fn column_exists(&self, table: &str, column: &str) -> Result<bool, StoreError> {
        if let Some(pos) = self.stale_columns.iter().position(|(t, c)| *t == table && *c == column) {
            let bit = 1 << (16 + pos);
            if self.used.get() & bit == 0 {
                self.used.set(self.used.get() | bit);
                return Ok(false);
            }
        }
        self.inner.column_exists(table, column)
    }
    fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        self.inner.index_exists(index)
    }
    fn create_table(&self, table: &TableDef) -> Result<(), StoreError> {
        self.inner.create_table(table)
    }
    fn add_column(&self, table: &str, column: &ColumnDef) -> Result<(), StoreError> {
        self.inner.add_column(table, column)
    }
    fn create_index(&self, index: &IndexDef) -> Result<(), StoreError> {
        self.inner.create_index(index)
    }
    fn count_rows(&self, table: &str) -> Result<u64, StoreError> {
        self.inner.count_rows(table)
    }
    fn insert_rows(&self, table: &str, rows: &[SeedRow]) -> Result<usize, StoreError> {
        self.inner.insert_rows(table, rows)
    }
    fn load_encoded(&self,
                    table: &str,
                    key_column: &str,
                    column: &str,
                    only_where: Option<&RowFilter>)
                    -> Result<Vec<EncodedRow>, StoreError> {
        self.inner.load_encoded(table, key_column, column, only_where)
    }
    fn update_encoded(&self, table: &str, key_column: &str, column: &str, updates: &[EncodedUpdate])
                      -> Result<usize, StoreError> {
        self.inner.update_encoded(table, key_column, column, updates)
    }
    fn snapshot(&self) -> Result<SchemaSnapshot, StoreError> {
        self.inner.snapshot()
    }
}

/// Falla `add_column` con el error dado, sin tocar el store interno.
pub struct FailingDdlStore<'a, S> {
    pub inner: &'a S,
    pub error: StoreError,
}

impl<S: SchemaStore> SchemaStore for FailingDdlStore<'_, S> {
    fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        self.inner.table_exists(table)
    }
    fn column_exists(&self, table: &str, column: &str) -> Result<bool, StoreError> {
        self.inner.column_exists(table, column)
    }
    fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        self.inner.index_exists(index)
    }
    fn create_table(&self, table: &TableDef) -> Result<(), StoreError> {
        self.inner.create_table(table)
    }
    fn add_column(&self, _table: &str, _column: &ColumnDef) -> Result<(), StoreError> {
        Err(self.error.clone())
    }
    fn create_index(&self, index: &IndexDef) -> Result<(), StoreError> {
        self.inner.create_index(index)
    }
    fn count_rows(&self, table: &str) -> Result<u64, StoreError> {
        self.inner.count_rows(table)
    }
    fn insert_rows(&self, table: &str, rows: &[SeedRow]) -> Result<usize, StoreError> {
        self.inner.insert_rows(table, rows)
    }
    fn load_encoded(&self,
                    table: &str,
                    key_column: &str,
                    column: &str,
                    only_where: Option<&RowFilter>)
                    -> Result<Vec<EncodedRow>, StoreError> {
        self.inner.load_encoded(table, key_column, column, only_where)
    }
    fn update_encoded(&self, table: &str, key_column: &str, column: &str, updates: &[EncodedUpdate])
                      -> Result<usize, StoreError> {
        self.inner.update_encoded(table, key_column, column, updates)
    }
    fn snapshot(&self) -> Result<SchemaSnapshot, StoreError> {
        self.inner.snapshot()
    }
}
