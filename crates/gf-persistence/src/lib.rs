//! gf-persistence
//!
//! Backends Postgres (Diesel) para la cadena de desarrollo: registro de
//! grupos/flows y log de eventos + historial de transacciones.
//!
//! Módulos:
//! - `pg`: `PgFlowRegistry`, `PgEventStore`, pool y retry.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_dev_pool_from_env, build_pool, ConnectionProvider, open_chain, PgChain, PgEventStore, PgFlowRegistry, PgPool, PoolProvider};
