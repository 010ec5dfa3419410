use chrono::{DateTime, Utc};
use log::{debug, error, info};
use once_cell::sync::OnceCell;

use crate::errors::SchemaError;
use crate::operation::SchemaPlan;
use crate::store::SchemaStore;

use super::{apply_all, bootstrap, seed_if_empty, BootstrapOutcome, SeedReport, Summary};

/// Lo que hizo el arranque en frío que confirmó el esquema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColdStartReport {
    pub bootstrap: BootstrapOutcome,
    pub migrations: Summary,
    pub seeds: SeedReport,
    pub confirmed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// El esquema ya estaba confirmado para este proceso; no hubo round trips.
    Warm,
    /// Esta llamada ejecutó la secuencia completa y confirmó el esquema.
    Confirmed(ColdStartReport),
}

/// Secuencia completa sin cache: bootstrap → migraciones → seeds.
pub fn cold_start<S>(store: &S, plan: &SchemaPlan) -> Result<ColdStartReport, SchemaError>
    where S: SchemaStore + ?Sized
{
    let bootstrap = bootstrap(store, &plan.schema)?;
    let migrations = apply_all(store, &plan.migrations)?;
    let seeds = seed_if_empty(store, &plan.seeds)?;
    Ok(ColdStartReport { bootstrap,
                         migrations,
                         seeds,
                         confirmed_at: Utc::now() })
}

/// Cache por proceso de "esquema confirmado".
///
/// Estados: COLD (celda vacía) → WARM (celda llena). La transición ocurre a lo
/// sumo una vez; una falla deja la celda vacía y la siguiente llamada reintenta
/// la secuencia completa. No existe WARM → COLD dentro de un proceso.
///
/// Mientras una llamada ejecuta la secuencia, las demás del mismo proceso
/// esperan en la celda y después toman el camino rápido.
#[derive(Debug, Default)]
pub struct InitGate {
    confirmed: OnceCell<ColdStartReport>,
}

static GLOBAL_GATE: InitGate = InitGate::new();

impl InitGate {
    pub const fn new() -> Self {
        Self { confirmed: OnceCell::new() }
    }

    /// Gate compartido por todo el proceso.
    pub fn global() -> &'static InitGate {
        &GLOBAL_GATE
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed.get().is_some()
    }

    /// Reporte del arranque que confirmó el esquema, si ya ocurrió.
    pub fn report(&self) -> Option<&ColdStartReport> {
        self.confirmed.get()
    }

    pub fn ensure_ready<S>(&self, store: &S, plan: &SchemaPlan) -> Result<Readiness, SchemaError>
        where S: SchemaStore + ?Sized
    {
        if self.confirmed.get().is_some() {
            return Ok(Readiness::Warm);
        }
        let mut ran_here = false;
        let report = self.confirmed.get_or_try_init(|| {
                                       ran_here = true;
                                       debug!("init gate: cold, running schema sequence");
                                       cold_start(store, plan).map_err(|e| {
                                                                  error!("init gate: schema sequence failed: {e}");
                                                                  e
                                                              })
                                   })?;
        if !ran_here {
            // Otra llamada del proceso confirmó mientras esperábamos.
            return Ok(Readiness::Warm);
        }
        info!("init gate: schema confirmed (newly applied: {:?})", report.migrations.newly_applied());
        Ok(Readiness::Confirmed(report.clone()))
    }
}
