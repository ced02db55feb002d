#![allow(dead_code)]

use gf_core::chain::ChainConfig;
use gf_persistence::config::DbConfig;
use gf_persistence::pg::{build_pool, PgPool};
use once_cell::sync::Lazy;

pub static TEST_POOL: Lazy<Option<PgPool>> = Lazy::new(|| {
    if std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    let cfg = DbConfig::from_env().ok()?;
    match build_pool(&cfg.url, 1, 2) {
        Ok(p) => Some(p),
        Err(e) => {
            eprintln!("No se pudo construir pool de test: {e}");
            None
        }
    }
});

pub fn with_pool<F, R>(f: F) -> Option<R>
    where F: FnOnce(&PgPool) -> R
{
    TEST_POOL.as_ref().map(f)
}

/// Config con semilla única: cuentas y contratos nuevos en cada test, sin
/// limpiar tablas entre corridas.
pub fn fresh_config() -> ChainConfig {
    ChainConfig::new(4, format!("pg-test-{}", uuid::Uuid::new_v4()))
}
