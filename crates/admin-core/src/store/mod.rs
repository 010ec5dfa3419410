//! Frontera con el almacenamiento relacional.
//!
//! El motor sólo habla con el store a través de `SchemaStore`. Cada método es
//! un round trip bloqueante; ninguno reintenta.

mod memory;

pub use memory::InMemorySchemaStore;

use crate::backfill::{EncodedRow, EncodedUpdate, RowFilter};
use crate::errors::StoreError;
use crate::schema::{ColumnDef, IndexDef, SchemaElement, SchemaSnapshot, TableDef};
use crate::seed::SeedRow;

pub trait SchemaStore {
    fn table_exists(&self, table: &str) -> Result<bool, StoreError>;
    fn column_exists(&self, table: &str, column: &str) -> Result<bool, StoreError>;
    fn index_exists(&self, index: &str) -> Result<bool, StoreError>;

    /// Crea la tabla. Puede fallar si ya existe; el motor re-sondea antes de
    /// interpretar la falla.
    fn create_table(&self, table: &TableDef) -> Result<(), StoreError>;
    fn add_column(&self, table: &str, column: &ColumnDef) -> Result<(), StoreError>;
    fn create_index(&self, index: &IndexDef) -> Result<(), StoreError>;

    fn count_rows(&self, table: &str) -> Result<u64, StoreError>;
    /// Inserta todas las filas en una sola transacción, ignorando las que
    /// choquen con una clave única existente. Devuelve cuántas entraron.
    fn insert_rows(&self, table: &str, rows: &[SeedRow]) -> Result<usize, StoreError>;

    /// Filas `(clave, valor)` ordenadas por clave; con `only_where`, sólo las
    /// que cumplen el filtro.
    fn load_encoded(&self,
                    table: &str,
                    key_column: &str,
                    column: &str,
                    only_where: Option<&RowFilter>)
                    -> Result<Vec<EncodedRow>, StoreError>;
    /// Escrituras compare-and-set en una sola transacción. Devuelve cuántas
    /// filas cambiaron realmente.
    fn update_encoded(&self,
                      table: &str,
                      key_column: &str,
                      column: &str,
                      updates: &[EncodedUpdate])
                      -> Result<usize, StoreError>;

    fn snapshot(&self) -> Result<SchemaSnapshot, StoreError>;

    fn element_exists(&self, element: &SchemaElement) -> Result<bool, StoreError> {
        match element {
            SchemaElement::Table { table } => self.table_exists(table),
            SchemaElement::Column { table, column } => self.column_exists(table, column),
            SchemaElement::Index { name, .. } => self.index_exists(name),
        }
    }
}
