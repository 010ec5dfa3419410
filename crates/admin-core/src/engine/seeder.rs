use log::{debug, info};

use crate::errors::SchemaError;
use crate::seed::SeedRule;
use crate::store::SchemaStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// (tabla, filas insertadas) para cada tabla que estaba vacía.
    pub seeded: Vec<(&'static str, usize)>,
    /// Tablas con datos: no se tocaron.
    pub untouched: Vec<&'static str>,
}

/// Inserta las filas de cada regla sólo si su tabla está vacía.
///
/// Corre en cada arranque en frío; la condición (tabla vacía) es la única
/// señal. Si un operador vacía una tabla a propósito, se vuelve a sembrar.
pub fn seed_if_empty<S>(store: &S, rules: &[SeedRule]) -> Result<SeedReport, SchemaError>
    where S: SchemaStore + ?Sized
{
    let mut report = SeedReport::default();
    for rule in rules {
        let label = format!("seed {}", rule.table);
        let count = store.count_rows(rule.table).map_err(|e| SchemaError::from_store(&label, e))?;
        if count > 0 {
            debug!("{label}: {count} rows present, skipping");
            report.untouched.push(rule.table);
            continue;
        }
        let rows = (rule.rows)();
        let inserted = store.insert_rows(rule.table, &rows)
                            .map_err(|e| SchemaError::from_store(&label, e))?;
        info!("{label}: inserted {inserted} of {} rows", rows.len());
        report.seeded.push((rule.table, inserted));
    }
    Ok(report)
}
