//! Cadena de desarrollo local que hospeda instancias de `GFflowsGroup`.
//!
//! Provee lo que un framework de testing de contratos ofrece: cuentas
//! desbloqueadas, despliegue, transacciones con receipts y eventos, y
//! consultas de sólo lectura. No hay consenso, gas ni firmas.

mod config;
mod devchain;
mod handle;
mod receipt;

pub use config::{ChainConfig, MIN_ACCOUNT_COUNT};
pub use devchain::{Chain, TxOptions};
pub use handle::FlowsGroupHandle;
pub use receipt::TransactionReceipt;
