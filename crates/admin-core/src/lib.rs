//! admin-core: motor de evolución de esquema y seeding.
//!
//! Mantiene al día la estructura de un store relacional de larga vida a través
//! de despliegues independientes y posiblemente concurrentes, sin tabla de
//! versiones ni locks: todo es aditivo e idempotente.
//!
//! Módulos:
//! - `schema`: declaraciones tipadas de tablas, columnas e índices.
//! - `operation`: `Operation`, `MigrationSet`, `CanonicalSchema`, `SchemaPlan`.
//! - `backfill`: transformaciones puras sobre colecciones codificadas.
//! - `seed`: reglas de datos de referencia.
//! - `store`: trait `SchemaStore` + backend en memoria.
//! - `engine`: `bootstrap`, `apply_all`, `seed_if_empty`, `InitGate`.

pub mod backfill;
pub mod engine;
pub mod errors;
pub mod operation;
pub mod schema;
pub mod seed;
pub mod store;

pub use backfill::{BackfillRule, Encoding, RowFilter, TagSet};
pub use engine::{apply_all, bootstrap, cold_start, seed_if_empty, BootstrapOutcome, ColdStartReport, InitGate,
                 OperationOutcome, Readiness, SeedReport, Summary};
pub use errors::{BackfillRowDecodeError, SchemaError, StoreError};
pub use operation::{Action, CanonicalSchema, IdempotencyClass, MigrationSet, Operation, SchemaPlan};
pub use schema::{column, ColumnDef, IndexDef, SchemaElement, SchemaSnapshot, TableDef};
pub use seed::{SeedRow, SeedRule, SeedValue};
pub use store::{InMemorySchemaStore, SchemaStore};
