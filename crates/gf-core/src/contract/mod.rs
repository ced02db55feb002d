//! Lógica del contrato `GFflowsGroup` y su ABI de métodos.
//!
//! El contrato no guarda estado propio: lee y escribe a través de un
//! `FlowRegistry`. La ejecución de un método es pura respecto al registro:
//! primero calcula los efectos (`Effects`) y sólo si no hubo revert la
//! cadena los aplica.

mod call;
mod flows_group;

pub use call::{FlowsGroupCall, FlowsGroupQuery, QueryOutput};
pub use flows_group::{CallContext, Effects, FlowsGroup};
