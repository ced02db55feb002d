//! Almacenamiento del estado del contrato: grupos desplegados y sus flows.

mod registry;
mod types;

pub use registry::{FlowRegistry, InMemoryFlowRegistry};
pub use types::{FlowRecord, FlowsGroupRecord};
