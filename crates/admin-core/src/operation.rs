//! Operaciones de esquema, el conjunto de migraciones y el esquema canónico.
//!
//! Reglas de autoría:
//! - Una operación publicada no se edita ni se elimina; sólo se agregan nuevas
//!   al final del `MigrationSet`.
//! - Toda operación es aditiva (crear tabla/columna/índice) o una
//!   transformación de datos idempotente (backfill).

use std::collections::{HashMap, HashSet};

use crate::backfill::BackfillRule;
use crate::errors::SchemaError;
use crate::schema::{is_identifier, ColumnDef, IndexDef, SchemaElement, TableDef};
use crate::seed::SeedRule;

#[derive(Debug, Clone, Copy)]
pub enum Action {
    CreateTable(TableDef),
    AddColumn { table: &'static str, column: ColumnDef },
    CreateIndex(IndexDef),
    Backfill(BackfillRule),
}

/// Cómo se interpreta una falla de la acción.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdempotencyClass {
    /// DDL aditivo: si el elemento objetivo ya existe, la falla se absorbe.
    AdditiveDdl,
    /// Transformación de datos: re-ejecutable; filas no decodificables se omiten.
    DataTransform,
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::CreateTable(_) => "create-table-if-absent",
            Action::AddColumn { .. } => "add-column-if-absent",
            Action::CreateIndex(_) => "create-index-if-absent",
            Action::Backfill(_) => "backfill-rows",
        }
    }

    pub fn idempotency(&self) -> IdempotencyClass {
        match self {
            Action::Backfill(_) => IdempotencyClass::DataTransform,
            _ => IdempotencyClass::AdditiveDdl,
        }
    }

    /// Elemento que la acción crea; `None` para backfills.
    pub fn target(&self) -> Option<SchemaElement> {
        match self {
            Action::CreateTable(t) => Some(SchemaElement::Table { table: t.name }),
            Action::AddColumn { table, column } => Some(SchemaElement::Column { table: *table, column: column.name }),
            Action::CreateIndex(i) => Some(SchemaElement::Index { table: i.table, name: i.name }),
            Action::Backfill(_) => None,
        }
    }

    fn identifiers(&self) -> Vec<&'static str> {
        match self {
            Action::CreateTable(t) => {
                let mut ids = vec![t.name];
                ids.extend(t.columns.iter().map(|c| c.name));
                ids
            }
            Action::AddColumn { table, column } => vec![*table, column.name],
            Action::CreateIndex(i) => {
                let mut ids = vec![i.name, i.table];
                ids.extend(i.columns.iter().copied());
                ids
            }
            Action::Backfill(b) => {
                let mut ids = vec![b.table, b.key_column, b.column];
                ids.extend(b.only_where.map(|f| f.column));
                ids
            }
        }
    }

    fn validate(&self, label: &str) -> Result<(), SchemaError> {
        if let Some(bad) = self.identifiers().into_iter().find(|id| !is_identifier(id)) {
            return Err(SchemaError::malformed(label, format!("invalid identifier {bad:?}")));
        }
        match self {
            Action::CreateTable(t) if t.columns.is_empty() => {
                Err(SchemaError::malformed(label, format!("table {} declares no columns", t.name)))
            }
            Action::CreateIndex(i) if i.columns.is_empty() => {
                Err(SchemaError::malformed(label, format!("index {} declares no columns", i.name)))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Operation {
    /// Identificador estable; nunca se reutiliza.
    pub id: &'static str,
    pub description: &'static str,
    pub action: Action,
}

impl Operation {
    pub const fn new(id: &'static str, description: &'static str, action: Action) -> Self {
        Self { id, description, action }
    }

    pub fn idempotency(&self) -> IdempotencyClass {
        self.action.idempotency()
    }
}

/// Secuencia ordenada y append-only de operaciones.
#[derive(Debug, Clone, Default)]
pub struct MigrationSet {
    operations: Vec<Operation>,
}

impl MigrationSet {
    /// Valida ids únicos e identificadores bien formados.
    pub fn new(operations: Vec<Operation>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for op in &operations {
            if !is_identifier(op.id) {
                return Err(SchemaError::malformed(op.id, "operation id must be a lowercase identifier"));
            }
            if !seen.insert(op.id) {
                return Err(SchemaError::malformed(op.id, "duplicate operation id"));
            }
            op.action.validate(op.id)?;
        }
        Ok(Self { operations })
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Las primeras `len` operaciones: el conjunto tal como lo conocía una
    /// versión anterior del servicio.
    pub fn truncated(&self, len: usize) -> MigrationSet {
        MigrationSet { operations: self.operations.iter().take(len).copied().collect() }
    }
}

/// Esquema declarativo completo que se aplica sólo contra un store vacío.
///
/// La tabla marcador debe ser la última en crearse: si el proceso muere a
/// mitad del bootstrap, el marcador sigue ausente y la siguiente invocación
/// reanuda.
#[derive(Debug, Clone)]
pub struct CanonicalSchema {
    marker: &'static str,
    actions: Vec<Action>,
}

impl CanonicalSchema {
    pub fn new(marker: &'static str, actions: Vec<Action>) -> Result<Self, SchemaError> {
        const LABEL: &str = "canonical schema";
        for action in &actions {
            if matches!(action, Action::AddColumn { .. } | Action::Backfill(_)) {
                return Err(SchemaError::malformed(LABEL, format!("{} is not allowed in the canonical schema", action.kind())));
            }
            action.validate(LABEL)?;
        }
        match actions.last() {
            Some(Action::CreateTable(t)) if t.name == marker => Ok(Self { marker, actions }),
            _ => Err(SchemaError::malformed(LABEL, format!("marker table {marker} must be the last statement"))),
        }
    }

    pub fn marker(&self) -> &'static str {
        self.marker
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.actions.iter().filter_map(|a| match a {
                                 Action::CreateTable(t) => Some(t),
                                 _ => None,
                             })
    }
}

/// Todo lo que necesita `InitGate`: esquema canónico, migraciones y seeds,
/// validados en conjunto.
#[derive(Debug, Clone)]
pub struct SchemaPlan {
    pub schema: CanonicalSchema,
    pub migrations: MigrationSet,
    pub seeds: Vec<SeedRule>,
}

impl SchemaPlan {
    /// Valida dependencias entre partes:
    /// - un backfill apunta a una columna declarada por el esquema canónico o
    ///   por una operación anterior;
    /// - una regla seed apunta a una tabla declarada.
    pub fn new(schema: CanonicalSchema, migrations: MigrationSet, seeds: Vec<SeedRule>) -> Result<Self, SchemaError> {
        let mut declared: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
        for table in schema.tables() {
            declared.entry(table.name).or_default().extend(table.columns.iter().map(|c| c.name));
        }
        for op in migrations.operations() {
            match &op.action {
                Action::CreateTable(t) => {
                    declared.entry(t.name).or_default().extend(t.columns.iter().map(|c| c.name));
                }
                Action::AddColumn { table, column } => {
                    declared.entry(*table).or_default().insert(column.name);
                }
                Action::CreateIndex(_) => {}
                Action::Backfill(rule) => {
                    let cols = declared.get(rule.table);
                    for col in [rule.key_column, rule.column].into_iter().chain(rule.only_where.map(|f| f.column)) {
                        if !cols.is_some_and(|c| c.contains(col)) {
                            return Err(SchemaError::malformed(op.id,
                                                              format!("backfill target {}.{col} is not declared before it",
                                                                      rule.table)));
                        }
                    }
                }
            }
        }
        for rule in &seeds {
            if !is_identifier(rule.table) || !declared.contains_key(rule.table) {
                return Err(SchemaError::malformed("seed rules", format!("seed table {} is not declared", rule.table)));
            }
        }
        Ok(Self { schema, migrations, seeds })
    }

    /// Mismo plan con el conjunto de migraciones recortado a `len`.
    pub fn with_migrations_truncated(&self, len: usize) -> SchemaPlan {
        SchemaPlan { schema: self.schema.clone(),
                     migrations: self.migrations.truncated(len),
                     seeds: self.seeds.clone() }
    }
}
