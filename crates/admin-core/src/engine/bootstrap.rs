use log::{debug, info};

use crate::errors::SchemaError;
use crate::operation::{Action, CanonicalSchema};
use crate::store::SchemaStore;

use super::{apply_additive, Additive};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// El marcador estaba ausente y se ejecutó el esquema completo.
    /// `created` cuenta los elementos creados por esta invocación.
    Applied { created: usize, already_present: usize },
    /// El marcador existe: no se ejecutó nada.
    AlreadyPresent,
}

/// Aplica el esquema canónico completo sólo si el marcador no existe.
///
/// Cada sentencia es independiente e idempotente; el marcador se crea al
/// final, así que una caída a mitad de camino se reanuda con otra llamada.
pub fn bootstrap<S>(store: &S, schema: &CanonicalSchema) -> Result<BootstrapOutcome, SchemaError>
    where S: SchemaStore + ?Sized
{
    let marker = schema.marker();
    let present = store.table_exists(marker)
                       .map_err(|e| SchemaError::from_store("bootstrap probe", e))?;
    if present {
        debug!("bootstrap: marker table {marker} present, skipping");
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    info!("bootstrap: marker table {marker} absent, applying canonical schema ({} statements)",
          schema.actions().len());
    let mut created = 0;
    let mut already_present = 0;
    for action in schema.actions() {
        let Some(target) = action.target() else { continue };
        let label = format!("bootstrap {}", target);
        let outcome = apply_additive(&label,
                                     &target,
                                     |el| store.element_exists(el),
                                     || match action {
                                         Action::CreateTable(t) => store.create_table(t),
                                         Action::CreateIndex(i) => store.create_index(i),
                                         Action::AddColumn { table, column } => store.add_column(table, column),
                                         Action::Backfill(_) => Ok(()),
                                     })?;
        match outcome {
            Additive::Created => created += 1,
            Additive::AlreadyPresent => already_present += 1,
        }
    }
    info!("bootstrap: done created={created} already_present={already_present}");
    Ok(BootstrapOutcome::Applied { created, already_present })
}
