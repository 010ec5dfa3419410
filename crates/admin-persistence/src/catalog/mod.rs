//! Catálogo del backend de administración: esquema canónico, conjunto de
//! migraciones y reglas seed, validados juntos en un `SchemaPlan`.

pub mod migrations;
pub mod seeds;
pub mod tables;

use admin_core::{Action, CanonicalSchema, MigrationSet, SchemaError, SchemaPlan};

pub fn baseline_schema() -> Result<CanonicalSchema, SchemaError> {
    CanonicalSchema::new(tables::SLOT_COUNTER.name, tables::BASELINE.iter().copied().map(Action::CreateTable).collect())
}

pub fn migration_set() -> Result<MigrationSet, SchemaError> {
    MigrationSet::new(migrations::operations())
}

/// Plan completo. Un error aquí es un defecto del catálogo, no del store.
pub fn plan() -> Result<SchemaPlan, SchemaError> {
    SchemaPlan::new(baseline_schema()?, migration_set()?, seeds::rules())
}
