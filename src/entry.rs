//! Punto de entrada de cada unidad de trabajo.
//!
//! Toda solicitud pasa por `RequestEntry::handle`, que confirma el esquema
//! (una vez por proceso, vía `InitGate`) antes de ejecutar el handler.

use admin_core::{InitGate, Readiness, SchemaPlan, SchemaStore};
use admin_persistence::{build_dev_pool_from_env, SqliteSchemaStore};
use log::{error, info};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Store SQLite según `DATABASE_URL` (y `.env` si existe). Sin URL devuelve
/// `ServiceError::Config`; un pool que no abre, `ServiceUnavailable`.
pub fn sqlite_store_from_env() -> Result<SqliteSchemaStore, ServiceError> {
    Ok(SqliteSchemaStore::from_pool(build_dev_pool_from_env()?))
}

pub struct RequestEntry<'g, S> {
    store: S,
    plan: SchemaPlan,
    gate: &'g InitGate,
    instance_id: Uuid,
}

impl<S: SchemaStore> RequestEntry<'static, S> {
    /// Entrada ligada al gate global del proceso.
    pub fn new(store: S, plan: SchemaPlan) -> Self {
        Self::with_gate(store, plan, InitGate::global())
    }
}

impl<'g, S: SchemaStore> RequestEntry<'g, S> {
    pub fn with_gate(store: S, plan: SchemaPlan, gate: &'g InitGate) -> Self {
        Self { store, plan, gate, instance_id: Uuid::new_v4() }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_confirmed()
    }

    /// Confirma el esquema. En caliente no toca el store.
    pub fn ensure_ready(&self) -> Result<(), ServiceError> {
        match self.gate.ensure_ready(&self.store, &self.plan) {
            Ok(Readiness::Warm) => Ok(()),
            Ok(Readiness::Confirmed(report)) => {
                info!("instance {}: schema confirmed at {} ({} operations newly applied, {} tables seeded)",
                      self.instance_id,
                      report.confirmed_at,
                      report.migrations.newly_applied().len(),
                      report.seeds.seeded.len());
                Ok(())
            }
            Err(e) => {
                error!("instance {}: schema not ready (transient: {}): {e}", self.instance_id, e.is_transient());
                Err(e.into())
            }
        }
    }

    /// Ejecuta `handler` sólo si el esquema está confirmado.
    pub fn handle<T, F>(&self, handler: F) -> Result<T, ServiceError>
        where F: FnOnce(&S) -> Result<T, ServiceError>
    {
        self.ensure_ready()?;
        handler(&self.store)
    }
}
