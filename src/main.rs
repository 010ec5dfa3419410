use admin_backend::{sqlite_store_from_env, RequestEntry, ServiceError};
use admin_core::{BootstrapOutcome, InitGate, SchemaStore};
use admin_persistence::catalog;

/// Un arranque en frío contra el store configurado.
///
/// Códigos de salida: 2 configuración, 3 pool, 4 catálogo inválido, 5 esquema
/// no confirmado.
fn main() {
    env_logger::init();

    let store = match sqlite_store_from_env() {
        Ok(s) => s,
        Err(e @ ServiceError::Config(_)) => {
            eprintln!("[admin-backend] {e}");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("[admin-backend] pool error: {e}");
            std::process::exit(3);
        }
    };
    let plan = match catalog::plan() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[admin-backend] catálogo inválido: {e}");
            std::process::exit(4);
        }
    };

    let entry = RequestEntry::new(store, plan);
    println!("[admin-backend] instance {}", entry.instance_id());
    if let Err(e) = entry.ensure_ready() {
        eprintln!("[admin-backend] {e}");
        std::process::exit(5);
    }

    if let Some(report) = InitGate::global().report() {
        match report.bootstrap {
            BootstrapOutcome::Applied { created, already_present } => {
                println!("bootstrap: {created} creados, {already_present} ya presentes")
            }
            BootstrapOutcome::AlreadyPresent => println!("bootstrap: esquema base ya presente"),
        }
        println!("migraciones nuevas: {:?}", report.migrations.newly_applied());
        for (table, rows) in &report.seeds.seeded {
            println!("seed {table}: {rows} filas");
        }
        let skipped = report.migrations.skipped_rows();
        if skipped > 0 {
            println!("filas omitidas en backfills: {skipped}");
        }
    }
    match entry.store().snapshot() {
        Ok(snap) => println!("tablas: {}, índices: {}", snap.tables.len(), snap.indexes.len()),
        Err(e) => eprintln!("[admin-backend] snapshot: {e}"),
    }
}
