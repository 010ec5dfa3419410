use log::{debug, info, warn};

use crate::backfill::{BackfillRule, EncodedUpdate};
use crate::errors::{BackfillRowDecodeError, SchemaError};
use crate::operation::{Action, IdempotencyClass, MigrationSet, Operation};
use crate::store::SchemaStore;

use super::{apply_additive, Additive};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub scanned: usize,
    pub rewritten: usize,
    pub unchanged: usize,
    /// Reescrituras descartadas porque la fila cambió entre lectura y escritura.
    pub contended: usize,
    pub skipped: Vec<BackfillRowDecodeError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Applied,
    AlreadyApplied,
    Backfilled(BackfillReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub id: &'static str,
    pub outcome: OperationOutcome,
}

impl OperationRecord {
    /// Un backfill cuenta como aplicado sólo si reescribió alguna fila.
    pub fn took_effect(&self) -> bool {
        match &self.outcome {
            OperationOutcome::Applied => true,
            OperationOutcome::AlreadyApplied => false,
            OperationOutcome::Backfilled(r) => r.rewritten > 0,
        }
    }
}

/// Qué hizo una pasada de `apply_all`. Sólo para observabilidad: volver a
/// correr siempre es seguro.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub records: Vec<OperationRecord>,
}

impl Summary {
    pub fn newly_applied(&self) -> Vec<&'static str> {
        self.records.iter().filter(|r| r.took_effect()).map(|r| r.id).collect()
    }

    pub fn already_applied(&self) -> Vec<&'static str> {
        self.records
            .iter()
            .filter(|r| !r.took_effect())
            .map(|r| r.id)
            .collect()
    }

    pub fn record(&self, id: &str) -> Option<&OperationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn skipped_rows(&self) -> usize {
        self.records
            .iter()
            .map(|r| match &r.outcome {
                OperationOutcome::Backfilled(b) => b.skipped.len(),
                _ => 0,
            })
            .sum()
    }
}

/// Aplica el conjunto completo en orden de declaración, contra un store en
/// cualquier estado previo.
///
/// No hay rollback: las operaciones son independientes, así que una pasada
/// interrumpida deja un subconjunto válido y la siguiente llamada continúa.
pub fn apply_all<S>(store: &S, set: &MigrationSet) -> Result<Summary, SchemaError>
    where S: SchemaStore + ?Sized
{
    let mut summary = Summary::default();
    for op in set.operations() {
        debug!("migration {}: {} ({})", op.id, op.description, op.action.kind());
        let outcome = apply_operation(store, op)?;
        match &outcome {
            OperationOutcome::Applied => info!("migration {} applied", op.id),
            OperationOutcome::AlreadyApplied => debug!("migration {} already applied", op.id),
            OperationOutcome::Backfilled(r) => {
                if r.rewritten > 0 || !r.skipped.is_empty() {
                    info!("migration {} backfilled rewritten={} skipped={} contended={}",
                          op.id,
                          r.rewritten,
                          r.skipped.len(),
                          r.contended);
                }
            }
        }
        summary.records.push(OperationRecord { id: op.id, outcome });
    }
    Ok(summary)
}

fn apply_operation<S>(store: &S, op: &Operation) -> Result<OperationOutcome, SchemaError>
    where S: SchemaStore + ?Sized
{
    let attempt = || match &op.action {
        Action::CreateTable(t) => store.create_table(t),
        Action::AddColumn { table, column } => store.add_column(table, column),
        Action::CreateIndex(i) => store.create_index(i),
        Action::Backfill(_) => Ok(()),
    };
    match op.idempotency() {
        IdempotencyClass::DataTransform => match &op.action {
            Action::Backfill(rule) => run_backfill(store, op.id, rule).map(OperationOutcome::Backfilled),
            _ => Err(SchemaError::malformed(op.id, "data transform without backfill rule")),
        },
        IdempotencyClass::AdditiveDdl => {
            let target = op.action
                           .target()
                           .ok_or_else(|| SchemaError::malformed(op.id, "additive action without target"))?;
            let outcome = apply_additive(op.id, &target, |el| store.element_exists(el), attempt)?;
            Ok(match outcome {
                Additive::Created => OperationOutcome::Applied,
                Additive::AlreadyPresent => OperationOutcome::AlreadyApplied,
            })
        }
    }
}

/// Lee todas las filas, transforma las que decodifican y escribe sólo las que
/// cambian. Una fila mal formada se registra y se omite.
fn run_backfill<S>(store: &S, id: &str, rule: &BackfillRule) -> Result<BackfillReport, SchemaError>
    where S: SchemaStore + ?Sized
{
    let rows = store.load_encoded(rule.table, rule.key_column, rule.column, rule.only_where.as_ref())
                    .map_err(|e| SchemaError::from_store(id, e))?;
    let mut report = BackfillReport { scanned: rows.len(), ..Default::default() };
    let mut updates = Vec::new();
    for row in rows {
        let Some(raw) = row.value else {
            report.unchanged += 1;
            continue;
        };
        let decoded = match rule.encoding.decode(&raw) {
            Ok(tags) => tags,
            Err(reason) => {
                warn!("migration {id}: skipping {}.{} row {}: {reason}", rule.table, rule.column, row.key);
                report.skipped.push(BackfillRowDecodeError { key: row.key, reason });
                continue;
            }
        };
        let next = (rule.transform)(&decoded);
        if next == decoded {
            report.unchanged += 1;
            continue;
        }
        match rule.encoding.encode(&next) {
            Ok(new) => updates.push(EncodedUpdate { key: row.key, old: raw, new }),
            Err(reason) => {
                warn!("migration {id}: cannot encode {}.{} row {}: {reason}", rule.table, rule.column, row.key);
                report.skipped.push(BackfillRowDecodeError { key: row.key, reason });
            }
        }
    }
    if !updates.is_empty() {
        report.rewritten = store.update_encoded(rule.table, rule.key_column, rule.column, &updates)
                                .map_err(|e| SchemaError::from_store(id, e))?;
        report.contended = updates.len().saturating_sub(report.rewritten);
    }
    Ok(report)
}
