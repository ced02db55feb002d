//! Eventos de contrato, transacciones y el trait `EventStore`.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{ContractEvent, EventDict, FlowCreated, LoggedEvent, TxRecord, TxStatus};
