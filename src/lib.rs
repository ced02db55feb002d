//! GF Flows
//!
//! Librería de la aplicación sobre `gf-core`:
//! - `config`: configuración global perezosa (`CONFIG`).
//! - `errors`: error de aplicación.
//! - `scenario`: escenario de referencia de `GFflowsGroup` (deploy,
//!   createFlow del owner, rechazo de otra cuenta, listado).

pub mod config;
pub mod errors;
pub mod scenario;

pub use config::{AppConfig, CONFIG};
pub use errors::AppError;
pub use scenario::{run_basic_ops, ScenarioReport};
