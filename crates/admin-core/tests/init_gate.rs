mod support;

use std::sync::{Arc, Barrier};
use std::thread;

use admin_core::{BootstrapOutcome, InMemorySchemaStore, InitGate, Readiness, SchemaStore};
use support::plan;

#[test]
fn empty_store_becomes_ready_and_warm() {
    let store = InMemorySchemaStore::new();
    let gate = InitGate::new();
    let plan = plan();

    let readiness = gate.ensure_ready(&store, &plan).expect("cold start");
    let Readiness::Confirmed(report) = readiness else { panic!("first call must run the sequence") };
    assert!(matches!(report.bootstrap, BootstrapOutcome::Applied { .. }));
    assert!(gate.is_confirmed());
    for table in ["users", "leads", "section_order", "slot_counter", "role_templates"] {
        assert!(store.table_exists(table).unwrap(), "{table} missing");
    }
    assert!(store.count_rows("section_order").unwrap() > 0);
    assert!(store.count_rows("role_templates").unwrap() > 0);

    // Camino rápido: ni siquiera toca el store.
    store.set_unavailable(true);
    assert_eq!(gate.ensure_ready(&store, &plan).unwrap(), Readiness::Warm);
}

#[test]
fn fully_migrated_store_is_a_no_op() {
    let store = InMemorySchemaStore::new();
    let plan = plan();
    InitGate::new().ensure_ready(&store, &plan).unwrap();
    let before = store.snapshot().unwrap();

    // Otra instancia que arranca en frío.
    let gate = InitGate::new();
    let Readiness::Confirmed(report) = gate.ensure_ready(&store, &plan).unwrap() else { panic!("cold instance") };
    assert_eq!(report.bootstrap, BootstrapOutcome::AlreadyPresent);
    assert!(report.migrations.newly_applied().is_empty());
    assert!(report.seeds.seeded.is_empty());
    assert_eq!(report.seeds.untouched.len(), plan.seeds.len());
    assert_eq!(store.snapshot().unwrap(), before);
    assert!(gate.is_confirmed());
}

#[test]
fn store_missing_only_newest_column_gets_it() {
    let store = InMemorySchemaStore::new();
    let current = plan();
    let previous = current.with_migrations_truncated(current.migrations.len() - 1);
    InitGate::new().ensure_ready(&store, &previous).unwrap();
    assert!(!store.column_exists("leads", "assigned_to").unwrap());
    let before = store.snapshot().unwrap();

    let Readiness::Confirmed(report) = InitGate::new().ensure_ready(&store, &current).unwrap() else { panic!() };
    assert_eq!(report.migrations.newly_applied(), vec!["leads_assigned_to"]);
    let after = store.snapshot().unwrap();
    assert!(before.is_subset_of(&after));
    assert!(after.has_column("leads", "assigned_to"));
}

#[test]
fn failure_leaves_gate_cold_and_next_call_retries() {
    let store = InMemorySchemaStore::new();
    let gate = InitGate::new();
    let plan = plan();

    store.set_unavailable(true);
    let err = gate.ensure_ready(&store, &plan).unwrap_err();
    assert!(err.is_transient());
    assert!(!gate.is_confirmed());

    store.set_unavailable(false);
    assert!(matches!(gate.ensure_ready(&store, &plan).unwrap(), Readiness::Confirmed(_)));
    assert!(gate.is_confirmed());
}

#[test]
fn concurrent_calls_in_one_process_confirm_once() {
    let store = Arc::new(InMemorySchemaStore::new());
    let gate = Arc::new(InitGate::new());
    let plan = Arc::new(plan());
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4).map(|_| {
                                    let (store, gate, plan, barrier) =
                                        (store.clone(), gate.clone(), plan.clone(), barrier.clone());
                                    thread::spawn(move || {
                                        barrier.wait();
                                        gate.ensure_ready(&*store, &plan).expect("ready")
                                    })
                                })
                                .collect();
    let results: Vec<Readiness> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let confirmed = results.iter().filter(|r| matches!(r, Readiness::Confirmed(_))).count();
    assert_eq!(confirmed, 1);
    assert_eq!(store.count_rows("section_order").unwrap(), 2);
}

#[test]
fn concurrent_cold_instances_converge_on_one_schema() {
    let store = Arc::new(InMemorySchemaStore::new());
    let plan = Arc::new(plan());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2).map(|_| {
                                    let (store, plan, barrier) = (store.clone(), plan.clone(), barrier.clone());
                                    thread::spawn(move || {
                                        // Cada instancia tiene su propio gate (sin memoria compartida).
                                        let gate = InitGate::new();
                                        barrier.wait();
                                        gate.ensure_ready(&*store, &plan).map(|_| gate.is_confirmed())
                                    })
                                })
                                .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), Ok(true));
    }
    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.tables.len(), 5);
    assert!(snapshot.has_column("users", "permissions"));
    assert!(snapshot.indexes.contains("idx_leads_status"));
    // las dos instancias pueden ver las tablas vacías y sembrar a la vez
    assert_eq!(store.count_rows("section_order").unwrap(), 2);
    assert_eq!(store.count_rows("role_templates").unwrap(), 2);
}
