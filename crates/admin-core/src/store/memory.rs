use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use crate::backfill::{EncodedRow, EncodedUpdate, RowFilter};
use crate::errors::StoreError;
use crate::schema::{ColumnDef, IndexDef, SchemaSnapshot, TableDef};
use crate::seed::{SeedRow, SeedValue};

use super::SchemaStore;

#[derive(Debug, Default)]
struct MemTable {
    columns: Vec<String>,
    /// Columnas declaradas `UNIQUE` o `PRIMARY KEY`.
    unique: Vec<String>,
    rows: Vec<BTreeMap<String, SeedValue>>,
}

#[derive(Debug, Default)]
struct MemState {
    tables: BTreeMap<String, MemTable>,
    indexes: BTreeMap<String, String>,
    unavailable: bool,
}

/// Backend en memoria con la misma semántica observable que el store SQL,
/// salvo que `create_table`/`create_index` rechazan elementos existentes (un
/// `CREATE` sin `IF NOT EXISTS`). Sólo se respeta la unicidad declarada a
/// nivel de columna; las restricciones de tabla se ignoran.
///
/// `set_unavailable(true)` simula una caída del store: toda llamada devuelve
/// `StoreError::Unavailable`.
#[derive(Debug, Default)]
pub struct InMemorySchemaStore {
    state: Mutex<MemState>,
}

impl InMemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.raw().unavailable = unavailable;
    }

    /// Filas de una tabla (orden de inserción). Vacío si no existe.
    pub fn rows(&self, table: &str) -> Vec<BTreeMap<String, SeedValue>> {
        self.raw().tables.get(table).map(|t| t.rows.clone()).unwrap_or_default()
    }

    /// Actualiza una celda directamente, como lo haría un operador.
    pub fn set_cell(&self, table: &str, key_column: &str, key: i64, column: &str, value: SeedValue) -> bool {
        let mut state = self.raw();
        let Some(t) = state.tables.get_mut(table) else { return false };
        match t.rows.iter_mut().find(|r| r.get(key_column) == Some(&SeedValue::Integer(key))) {
            Some(row) => {
                row.insert(column.to_string(), value);
                true
            }
            None => false,
        }
    }

    fn raw(&self) -> MutexGuard<'_, MemState> {
        // Un panic dentro del lock no deja estado a medio escribir.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemState>, StoreError> {
        let state = self.raw();
        if state.unavailable {
            return Err(StoreError::Unavailable("in-memory store marked unavailable".into()));
        }
        Ok(state)
    }
}

impl MemTable {
    /// `NULL` nunca choca, igual que en SQL.
    fn conflicts(&self, row: &BTreeMap<String, SeedValue>) -> bool {
        self.unique.iter().any(|col| match row.get(col) {
                              None | Some(SeedValue::Null) => false,
                              Some(v) => self.rows.iter().any(|r| r.get(col) == Some(v)),
                          })
    }
}

fn is_unique(definition: &str) -> bool {
    let upper = definition.to_ascii_uppercase();
    upper.contains("UNIQUE") || upper.contains("PRIMARY KEY")
}

fn missing_table(table: &str) -> StoreError {
    StoreError::Rejected(format!("no such table: {table}"))
}

impl SchemaStore for InMemorySchemaStore {
    fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.tables.contains_key(table))
    }

    fn column_exists(&self, table: &str, column: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?
               .tables
               .get(table)
               .is_some_and(|t| t.columns.iter().any(|c| c == column)))
    }

    fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.indexes.contains_key(index))
    }

    fn create_table(&self, table: &TableDef) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if state.tables.contains_key(table.name) {
            return Err(StoreError::Rejected(format!("table {} already exists", table.name)));
        }
        let columns = table.columns.iter().map(|c| c.name.to_string()).collect();
        let unique = table.columns
                          .iter()
                          .filter(|c| is_unique(c.definition))
                          .map(|c| c.name.to_string())
                          .collect();
        state.tables.insert(table.name.to_string(), MemTable { columns, unique, rows: Vec::new() });
        Ok(())
    }

    fn add_column(&self, table: &str, column: &ColumnDef) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let t = state.tables.get_mut(table).ok_or_else(|| missing_table(table))?;
        if t.columns.iter().any(|c| c == column.name) {
            return Err(StoreError::Rejected(format!("duplicate column name: {}", column.name)));
        }
        t.columns.push(column.name.to_string());
        Ok(())
    }

    fn create_index(&self, index: &IndexDef) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        let t = state.tables.get(index.table).ok_or_else(|| missing_table(index.table))?;
        if let Some(col) = index.columns.iter().find(|c| !t.columns.iter().any(|tc| tc == *c)) {
            return Err(StoreError::Rejected(format!("no such column: {col}")));
        }
        if state.indexes.contains_key(index.name) {
            return Err(StoreError::Rejected(format!("index {} already exists", index.name)));
        }
        state.indexes.insert(index.name.to_string(), index.table.to_string());
        Ok(())
    }

    fn count_rows(&self, table: &str) -> Result<u64, StoreError> {
        let state = self.lock()?;
        let t = state.tables.get(table).ok_or_else(|| missing_table(table))?;
        Ok(t.rows.len() as u64)
    }

    fn insert_rows(&self, table: &str, rows: &[SeedRow]) -> Result<usize, StoreError> {
        let mut state = self.lock()?;
        let t = state.tables.get_mut(table).ok_or_else(|| missing_table(table))?;
        for row in rows {
            if let Some(col) = row.columns().find(|c| !t.columns.iter().any(|tc| tc == c)) {
                return Err(StoreError::Rejected(format!("table {table} has no column named {col}")));
            }
        }
        let mut inserted = 0;
        for row in rows {
            let row: BTreeMap<String, SeedValue> =
                row.values().iter().map(|(c, v)| (c.to_string(), v.clone())).collect();
            if t.conflicts(&row) {
                continue;
            }
            t.rows.push(row);
            inserted += 1;
        }
        Ok(inserted)
    }

    fn load_encoded(&self,
                    table: &str,
                    key_column: &str,
                    column: &str,
                    only_where: Option<&RowFilter>)
                    -> Result<Vec<EncodedRow>, StoreError> {
        let state = self.lock()?;
        let t = state.tables.get(table).ok_or_else(|| missing_table(table))?;
        let mut out = Vec::with_capacity(t.rows.len());
        let selected = t.rows.iter().filter(|row| match only_where {
                                        Some(f) => row.get(f.column) == Some(&SeedValue::Text(f.equals.to_string())),
                                        None => true,
                                    });
        for row in selected {
            let key = match row.get(key_column) {
                Some(SeedValue::Integer(k)) => *k,
                _ => return Err(StoreError::Rejected(format!("{table}.{key_column} is not an integer key"))),
            };
            let value = match row.get(column) {
                Some(SeedValue::Text(v)) => Some(v.clone()),
                _ => None,
            };
            out.push(EncodedRow { key, value });
        }
        out.sort_by_key(|r| r.key);
        Ok(out)
    }

    fn update_encoded(&self,
                      table: &str,
                      key_column: &str,
                      column: &str,
                      updates: &[EncodedUpdate])
                      -> Result<usize, StoreError> {
        let mut state = self.lock()?;
        let t = state.tables.get_mut(table).ok_or_else(|| missing_table(table))?;
        let mut changed = 0;
        for update in updates {
            let current = SeedValue::Text(update.old.clone());
            if let Some(row) = t.rows
                                .iter_mut()
                                .find(|r| r.get(key_column) == Some(&SeedValue::Integer(update.key)) && r.get(column) == Some(&current))
            {
                row.insert(column.to_string(), SeedValue::Text(update.new.clone()));
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn snapshot(&self) -> Result<SchemaSnapshot, StoreError> {
        let state = self.lock()?;
        let tables = state.tables
                          .iter()
                          .map(|(name, t)| (name.clone(), t.columns.iter().cloned().collect::<BTreeSet<_>>()))
                          .collect();
        let indexes = state.indexes.keys().cloned().collect();
        Ok(SchemaSnapshot { tables, indexes })
    }
}
