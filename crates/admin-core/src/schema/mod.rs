//! Declaraciones tipadas de elementos de esquema.
//!
//! Las definiciones de columna llevan el fragmento SQL tal cual (`TEXT NOT
//! NULL DEFAULT ''`); el motor sólo razona sobre nombres. Cada backend decide
//! cómo renderizarlas.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Columna: nombre + fragmento de definición.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub definition: &'static str,
}

pub const fn column(name: &'static str, definition: &'static str) -> ColumnDef {
    ColumnDef { name, definition }
}

/// Tabla completa. `constraints` son restricciones a nivel tabla (FOREIGN KEY,
/// UNIQUE compuesto) que se añaden tras las columnas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub constraints: &'static [&'static str],
}

impl TableDef {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.name == column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDef {
    pub name: &'static str,
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub unique: bool,
}

/// Elemento de esquema identificable en el catálogo del store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaElement {
    Table { table: &'static str },
    Column { table: &'static str, column: &'static str },
    Index { table: &'static str, name: &'static str },
}

impl SchemaElement {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Table { table } | Self::Column { table, .. } | Self::Index { table, .. } => *table,
        }
    }

    pub fn column(&self) -> Option<&'static str> {
        match self {
            Self::Column { column, .. } => Some(*column),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table { table } => write!(f, "table {table}"),
            Self::Column { table, column } => write!(f, "column {table}.{column}"),
            Self::Index { table, name } => write!(f, "index {name} on {table}"),
        }
    }
}

/// Vista comparable del esquema presente en un store: tablas con su conjunto
/// de columnas e índices por nombre. El orden físico de columnas no cuenta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    pub tables: BTreeMap<String, BTreeSet<String>>,
    pub indexes: BTreeSet<String>,
}

impl SchemaSnapshot {
    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables.get(table).is_some_and(|cols| cols.contains(column))
    }

    /// `true` si todo lo presente en `self` también está en `other`.
    pub fn is_subset_of(&self, other: &SchemaSnapshot) -> bool {
        self.indexes.is_subset(&other.indexes)
        && self.tables
               .iter()
               .all(|(t, cols)| other.tables.get(t).is_some_and(|o| cols.is_subset(o)))
    }
}

/// Identificador aceptado en tablas, columnas e índices: `[a-z_][a-z0-9_]*`.
///
/// Los nombres se interpolan en DDL, así que la validación es estricta.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
