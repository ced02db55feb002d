//! main-core: corre el escenario de referencia de `GFflowsGroup`.
//!
//! Siempre en memoria; con el feature `pg_demo` y `DATABASE_URL` definido,
//! también sobre Postgres. Sale con código 1 si algún escenario falla.
use std::process::exit;

use gf_core::chain::Chain;
use gfflows_rust::{run_basic_ops, AppError, ScenarioReport, CONFIG};

fn print_report(label: &str, report: &ScenarioReport) {
    println!("[{label}] group={} owner={}", report.group, report.owner);
    println!("[{label}] createFlow txid={} fields={:?} name={}",
             report.create_txid, report.event_fields, report.event_name);
    println!("[{label}] accounts[1] -> {}", report.rejection);
    println!("[{label}] getAllFlowNames -> {:?}", report.flow_names);
    println!("[{label}] {}", if report.passed() { "OK" } else { "FALLÓ" });
}

fn run_in_memory() -> Result<ScenarioReport, AppError> {
    let mut chain = Chain::with_config(CONFIG.chain_config());
    run_basic_ops(&mut chain)
}

#[cfg(feature = "pg_demo")]
fn run_on_postgres() -> Option<Result<ScenarioReport, AppError>> {
    let db = CONFIG.database.as_ref()?;
    Some(pg_scenario(db))
}

#[cfg(feature = "pg_demo")]
fn pg_scenario(db: &gfflows_rust::config::DatabaseConfig) -> Result<ScenarioReport, AppError> {
    let pool = gf_persistence::build_pool(&db.url, db.min_connections, db.max_connections)?;
    let mut chain = gf_persistence::open_chain(&pool, CONFIG.chain_config())?;
    run_basic_ops(&mut chain)
}

#[cfg(not(feature = "pg_demo"))]
fn run_on_postgres() -> Option<Result<ScenarioReport, AppError>> {
    None
}

fn main() {
    let mut ok = true;
    let runs = [Some(("memory", run_in_memory())), run_on_postgres().map(|r| ("postgres", r))];
    for (label, result) in runs.into_iter().flatten() {
        match result {
            Ok(report) => {
                print_report(label, &report);
                ok &= report.passed();
            }
            Err(e) => {
                eprintln!("[{label}] error: {e}");
                ok = false;
            }
        }
    }
    if !ok {
        exit(1);
    }
}
