//! Implementaciones Postgres (Diesel) de los traits del core.
//!
//! - `PgFlowRegistry`: grupos y flows (`flows_groups`, `flows`). El orden de
//!   `flow_names` lo da la columna `position`.
//! - `PgEventStore`: eventos confirmados append-only (`contract_events`,
//!   orden total por `seq`) e historial (`chain_transactions`).
//!
//! Paridad 1:1 con los backends en memoria: mismos errores (`Conflict`,
//! `NotFound`) y mismo orden observable. Lecturas y escrituras se reintentan
//! ante errores transitorios.

mod event_store;
mod registry;

use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use gf_core::chain::{Chain, ChainConfig};
use gf_core::errors::ChainError;
use gf_core::model::Address;
use log::{info, warn};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;

pub use event_store::PgEventStore;
pub use registry::PgFlowRegistry;

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
///
/// Al construirlo se corre el set de migraciones pendientes (una sola vez).
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type PgPooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Cadena de desarrollo respaldada por Postgres.
pub type PgChain = Chain<PgFlowRegistry<PoolProvider>, PgEventStore<PoolProvider>>;

/// Proveedor abstracto de conexiones.
///
/// Contrato: devuelve una conexión válida o `PersistenceError::TransientIo`.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError>;
}

/// `ConnectionProvider` respaldado por un `PgPool`. Clonarlo comparte el pool.
#[derive(Clone)]
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Determina si un error es transitorio (recomendado reintentar con backoff).
fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        // Algunos errores del driver llegan como Unknown con texto.
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("could not serialize access due to concurrent update")
            || m.contains("terminating connection due to administrator command")
            || m.contains("connection closed")
            || m.contains("connection refused")
            || m.contains("timeout")
        }
        _ => false,
    }
}

/// Retry simple con backoff lineal (hasta 3 reintentos: 15ms, 30ms, 45ms).
/// Emite `warn!` por intento.
pub(crate) fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms",
                      attempts + 1,
                      e,
                      delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Parsea una dirección guardada como texto.
pub(crate) fn parse_address(column: &str, value: &str) -> Result<Address, PersistenceError> {
    value.parse::<Address>()
         .map_err(|e| PersistenceError::Decode(format!("{column}='{value}': {e}")))
}

/// Convierte contadores de la DB (`BIGINT`) a `u64`.
pub(crate) fn to_u64(column: &str, value: i64) -> Result<u64, PersistenceError> {
    u64::try_from(value).map_err(|_| PersistenceError::Decode(format!("{column}={value} is negative")))
}

pub(crate) fn to_i64(column: &str, value: u64) -> Result<i64, PersistenceError> {
    i64::try_from(value).map_err(|_| PersistenceError::Decode(format!("{column}={value} overflows BIGINT")))
}

/// Construye un pool Postgres r2d2 a partir de URL y corre las migraciones.
///
/// Si `min_size > max_size` se usa `min_size = max_size`; tamaños 0 se
/// elevan a 1.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = min_size.max(1);
    let validated_max = max_size.max(1);
    if validated_min > validated_max {
        warn!("min_size > max_size ({} > {}), ajustando min=max", validated_min, validated_max);
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    info!("pg pool ready min={} max={}", final_min, validated_max);
    Ok(pool)
}

/// Helper de desarrollo: carga `.env`, lee configuración (DATABASE_URL,
/// tamaños) y construye un pool ya migrado.
pub fn build_dev_pool_from_env() -> Result<PgPool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = crate::config::DbConfig::from_env()?;
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}

/// Abre una cadena sobre `pool`. La altura se retoma del historial.
pub fn open_chain(pool: &PgPool, config: ChainConfig) -> Result<PgChain, ChainError> {
    let provider = PoolProvider { pool: pool.clone() };
    Chain::new_with_stores(config, PgFlowRegistry::new(provider.clone()), PgEventStore::new(provider))
}
