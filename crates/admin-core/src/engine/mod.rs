//! Componentes que mantienen el esquema al día en cada arranque en frío:
//! `bootstrap` → `apply_all` → `seed_if_empty`, orquestados por `InitGate`.

mod bootstrap;
mod gate;
mod runner;
mod seeder;

pub use bootstrap::{bootstrap, BootstrapOutcome};
pub use gate::{cold_start, ColdStartReport, InitGate, Readiness};
pub use runner::{apply_all, BackfillReport, OperationOutcome, OperationRecord, Summary};
pub use seeder::{seed_if_empty, SeedReport};

use log::debug;

use crate::errors::{SchemaError, StoreError};
use crate::schema::SchemaElement;

/// Resultado de una acción aditiva.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Additive {
    Created,
    AlreadyPresent,
}

/// Aplica una acción aditiva con clasificación estructural de fallas:
///
/// 1. si el elemento ya está en el catálogo, no se intenta nada;
/// 2. si el intento falla, se vuelve a sondear: presente ⇒ otra instancia
///    ganó la carrera (se absorbe); ausente ⇒ la falla original se propaga
///    (`Unavailable` ⇒ transitoria, `Rejected` ⇒ operación mal formada).
///
/// Nunca se interpreta el texto del error.
pub(crate) fn apply_additive<F>(label: &str,
                                target: &SchemaElement,
                                probe: impl Fn(&SchemaElement) -> Result<bool, StoreError>,
                                attempt: F)
                                -> Result<Additive, SchemaError>
    where F: FnOnce() -> Result<(), StoreError>
{
    if probe(target).map_err(|e| SchemaError::from_store(label, e))? {
        debug!("{label}: {target} already present");
        return Ok(Additive::AlreadyPresent);
    }
    match attempt() {
        Ok(()) => Ok(Additive::Created),
        Err(err) => match probe(target) {
            Ok(true) => {
                debug!("{label}: {target} appeared concurrently ({err}); treating as already present");
                Ok(Additive::AlreadyPresent)
            }
            Ok(false) => Err(SchemaError::from_store(label, err)),
            // La falla original es más informativa que la del re-sondeo, salvo
            // que el re-sondeo muestre que el store se cayó.
            Err(probe_err @ StoreError::Unavailable(_)) => Err(SchemaError::from_store(label, probe_err)),
            Err(StoreError::Rejected(_)) => Err(SchemaError::from_store(label, err)),
        },
    }
}
