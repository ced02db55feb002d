//! Escenario de referencia de `GFflowsGroup`.
//!
//! 1. `accounts[0]` despliega `test_flows`.
//! 2. `accounts[0]` crea `test_flow_01` y el receipt trae un `FlowCreated`
//!    con `creatorAddr` y `nameStr`.
//! 3. `accounts[1]` intenta crear `test_flow_02` y la VM revierte.
//! 4. `getAllFlowNames()` devuelve exactamente `["test_flow_01"]`.
//!
//! Funciona sobre cualquier backend de la cadena (memoria o Postgres).
use gf_core::chain::Chain;
use gf_core::constants::{FIELD_CREATOR_ADDR, FIELD_NAME_STR, FLOW_CREATED_EVENT};
use gf_core::event::{EventStore, FlowCreated};
use gf_core::model::Address;
use gf_core::repo::FlowRegistry;
use log::info;
use serde::Serialize;

use crate::errors::AppError;

pub const GROUP_NAME: &str = "test_flows";
pub const OWNER_FLOW: &str = "test_flow_01";
pub const REJECTED_FLOW: &str = "test_flow_02";

/// Resultado observable del escenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub group: Address,
    pub owner: Address,
    pub create_txid: String,
    /// Campos del `FlowCreated`, en orden.
    pub event_fields: Vec<String>,
    pub event_creator: Address,
    /// `nameStr` decodificado.
    pub event_name: String,
    /// Mensaje del revert de la llamada de `accounts[1]`.
    pub rejection: String,
    pub flow_names: Vec<String>,
}

impl ScenarioReport {
    /// `true` si todo lo observado coincide con lo esperado.
    pub fn passed(&self) -> bool {
        self.event_fields.iter().any(|f| f == FIELD_CREATOR_ADDR)
        && self.event_fields.iter().any(|f| f == FIELD_NAME_STR)
        && self.event_creator == self.owner
        && self.event_name == OWNER_FLOW
        && self.flow_names == [OWNER_FLOW]
    }
}

/// Corre el escenario. Un paso que no se comporta como se espera es
/// `AppError::Scenario`; un error del backend se propaga tal cual.
pub fn run_basic_ops<R, E>(chain: &mut Chain<R, E>) -> Result<ScenarioReport, AppError>
    where R: FlowRegistry,
          E: EventStore
{
    let owner = chain.accounts()
                     .get(0)
                     .ok_or_else(|| AppError::Scenario("chain has no accounts[0]".into()))?;
    let other = chain.accounts()
                     .get(1)
                     .ok_or_else(|| AppError::Scenario("chain has no accounts[1]".into()))?;

    let group = chain.deploy_flows_group(GROUP_NAME, owner)?;
    info!("scenario: deployed {} at {}", GROUP_NAME, group.address);

    let receipt = group.create_flow(chain, OWNER_FLOW, owner)?;
    let event = receipt.events
                       .get(FLOW_CREATED_EVENT)
                       .ok_or_else(|| AppError::Scenario(format!("{FLOW_CREATED_EVENT} not emitted")))?;
    let typed = FlowCreated::try_from(event).map_err(|e| AppError::Scenario(e.to_string()))?;
    let event_name = typed.name().map_err(|e| AppError::Scenario(e.to_string()))?;

    let rejection = match group.create_flow(chain, REJECTED_FLOW, other) {
        Err(e) if e.is_vm_error() => e.to_string(),
        Err(e) => return Err(e.into()),
        Ok(r) => return Err(AppError::Scenario(format!("non-owner createFlow was mined in tx {}", r.txid))),
    };
    info!("scenario: accounts[1] rejected: {}", rejection);

    let flow_names = group.get_all_flow_names(chain)?;
    Ok(ScenarioReport { group: group.address,
                        owner,
                        create_txid: receipt.txid.clone(),
                        event_fields: event.keys().into_iter().map(str::to_string).collect(),
                        event_creator: typed.creator_addr,
                        event_name,
                        rejection,
                        flow_names })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_scenario_passes() {
        let mut chain = Chain::new();
        let report = run_basic_ops(&mut chain).unwrap();
        assert!(report.passed(), "{report:?}");
        assert_eq!(report.owner, chain.accounts()[0]);
        assert!(report.rejection.contains("revert"));
    }

    #[test]
    fn second_run_deploys_a_new_group() {
        let mut chain = Chain::new();
        let a = run_basic_ops(&mut chain).unwrap();
        let b = run_basic_ops(&mut chain).unwrap();
        assert_ne!(a.group, b.group);
        assert!(b.passed());
    }
}
