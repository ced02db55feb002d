//! `GFflowsGroup`: registro de flows con nombre, administrado por su owner.
//!
//! Reglas de `createFlow`, en este orden:
//! 1. el sender debe ser el owner (`Revert::NotOwner`), sin mirar el nombre;
//! 2. el nombre no puede ser vacío (`Revert::EmptyName`);
//! 3. el nombre no puede existir ya en el grupo (`Revert::FlowAlreadyExists`).
//!
//! Si todo pasa, se produce exactamente un `FlowCreated`.
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{FlowsGroupCall, FlowsGroupQuery, QueryOutput};
use crate::errors::{ContractError, Revert, StoreError};
use crate::event::{ContractEvent, FlowCreated};
use crate::model::Address;
use crate::repo::{FlowRecord, FlowRegistry, FlowsGroupRecord};

/// Contexto de ejecución de una transacción.
#[derive(Debug, Clone)]
pub struct CallContext {
    pub sender: Address,
    pub contract: Address,
    pub txid: String,
    pub timestamp: DateTime<Utc>,
}

/// Efectos calculados por un método exitoso, pendientes de aplicar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub flows: Vec<FlowRecord>,
    pub events: Vec<ContractEvent>,
}

impl Effects {
    /// Aplica los cambios de estado al registro. Los eventos los persiste la
    /// cadena.
    pub fn apply<R: FlowRegistry + ?Sized>(&self, registry: &mut R) -> Result<(), StoreError> {
        for flow in &self.flows {
            registry.insert_flow(flow)?;
        }
        Ok(())
    }
}

pub struct FlowsGroup;

impl FlowsGroup {
    /// Constructor del contrato: el sender del despliegue queda como owner.
    pub fn init(ctx: &CallContext, name: &str) -> FlowsGroupRecord {
        FlowsGroupRecord { address: ctx.contract,
                           name: name.to_string(),
                           owner: ctx.sender,
                           created_at: ctx.timestamp,
                           deploy_txid: ctx.txid.clone() }
    }

    /// Ejecuta un método que modifica estado. No escribe en `registry`.
    pub fn execute<R: FlowRegistry + ?Sized>(registry: &R,
                                             ctx: &CallContext,
                                             call: &FlowsGroupCall)
                                             -> Result<Effects, ContractError> {
        let group = load_group(registry, &ctx.contract)?;
        match call {
            FlowsGroupCall::CreateFlow { name } => Self::create_flow(registry, &group, ctx, name),
        }
    }

    fn create_flow<R: FlowRegistry + ?Sized>(registry: &R,
                                             group: &FlowsGroupRecord,
                                             ctx: &CallContext,
                                             name: &str)
                                             -> Result<Effects, ContractError> {
        if ctx.sender != group.owner {
            return Err(Revert::NotOwner.into());
        }
        if name.is_empty() {
            return Err(Revert::EmptyName.into());
        }
        if registry.flow(&group.address, name)?.is_some() {
            return Err(Revert::FlowAlreadyExists(name.to_string()).into());
        }
        let position = registry.flow_count(&group.address)?;
        let record = FlowRecord { id: Uuid::new_v4(),
                                  group: group.address,
                                  name: name.to_string(),
                                  creator: ctx.sender,
                                  created_at: ctx.timestamp,
                                  position };
        let event = FlowCreated::new(ctx.sender, name).into_event(group.address);
        Ok(Effects { flows: vec![record], events: vec![event] })
    }

    /// Ejecuta un método de sólo lectura.
    pub fn query<R: FlowRegistry + ?Sized>(registry: &R,
                                           contract: &Address,
                                           query: &FlowsGroupQuery)
                                           -> Result<QueryOutput, StoreError> {
        let group = load_group(registry, contract)?;
        let out = match query {
            FlowsGroupQuery::GetAllFlowNames => QueryOutput::Names(registry.flow_names(contract)?),
            FlowsGroupQuery::GetName => QueryOutput::Text(group.name),
            FlowsGroupQuery::GetOwner => QueryOutput::Address(group.owner),
            FlowsGroupQuery::FlowExists { name } => QueryOutput::Bool(registry.flow(contract, name)?.is_some()),
            FlowsGroupQuery::GetFlowsCount => QueryOutput::Count(registry.flow_count(contract)?),
        };
        Ok(out)
    }
}

fn load_group<R: FlowRegistry + ?Sized>(registry: &R, address: &Address) -> Result<FlowsGroupRecord, StoreError> {
    registry.group(address)?.ok_or_else(|| StoreError::NotFound(format!("flows group {}", address)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FLOW_CREATED_EVENT;
    use crate::repo::InMemoryFlowRegistry;

    fn ctx(sender: Address, contract: Address) -> CallContext {
        CallContext { sender, contract, txid: "0xabc".into(), timestamp: Utc::now() }
    }

    fn setup() -> (InMemoryFlowRegistry, Address, Address) {
        let owner = Address::derive("test", &[b"owner"]);
        let contract = Address::derive("test", &[b"contract"]);
        let mut reg = InMemoryFlowRegistry::new();
        reg.insert_group(&FlowsGroup::init(&ctx(owner, contract), "test_flows")).unwrap();
        (reg, owner, contract)
    }

    fn create(name: &str) -> FlowsGroupCall {
        FlowsGroupCall::CreateFlow { name: name.into() }
    }

    #[test]
    fn owner_creates_flow_with_single_event() {
        let (mut reg, owner, contract) = setup();
        let effects = FlowsGroup::execute(&reg, &ctx(owner, contract), &create("f1")).unwrap();
        assert_eq!(effects.flows.len(), 1);
        assert_eq!(effects.events.len(), 1);
        assert_eq!(effects.events[0].name, FLOW_CREATED_EVENT);
        // nada se escribe hasta aplicar
        assert_eq!(reg.flow_count(&contract).unwrap(), 0);
        effects.apply(&mut reg).unwrap();
        assert_eq!(reg.flow_names(&contract).unwrap(), vec!["f1"]);
    }

    #[test]
    fn non_owner_is_rejected_before_name_checks() {
        let (reg, _owner, contract) = setup();
        let other = Address::derive("test", &[b"editor"]);
        for name in ["", "f1", "anything"] {
            let err = FlowsGroup::execute(&reg, &ctx(other, contract), &create(name)).unwrap_err();
            assert_eq!(err, ContractError::Revert(Revert::NotOwner));
        }
    }

    #[test]
    fn empty_and_duplicate_names_revert() {
        let (mut reg, owner, contract) = setup();
        let c = ctx(owner, contract);
        assert_eq!(FlowsGroup::execute(&reg, &c, &create("")).unwrap_err(),
                   ContractError::Revert(Revert::EmptyName));
        FlowsGroup::execute(&reg, &c, &create("f1")).unwrap().apply(&mut reg).unwrap();
        assert_eq!(FlowsGroup::execute(&reg, &c, &create("f1")).unwrap_err(),
                   ContractError::Revert(Revert::FlowAlreadyExists("f1".into())));
    }

    #[test]
    fn queries_reflect_group_state() {
        let (mut reg, owner, contract) = setup();
        FlowsGroup::execute(&reg, &ctx(owner, contract), &create("a")).unwrap().apply(&mut reg).unwrap();
        let q = |query: FlowsGroupQuery| FlowsGroup::query(&reg, &contract, &query).unwrap();
        assert_eq!(q(FlowsGroupQuery::GetName).as_text(), Some("test_flows"));
        assert_eq!(q(FlowsGroupQuery::GetOwner).as_address(), Some(owner));
        assert_eq!(q(FlowsGroupQuery::GetFlowsCount).as_count(), Some(1));
        assert_eq!(q(FlowsGroupQuery::FlowExists { name: "a".into() }).as_bool(), Some(true));
        assert_eq!(q(FlowsGroupQuery::FlowExists { name: "b".into() }).as_bool(), Some(false));
    }

    #[test]
    fn unknown_contract_is_not_found() {
        let (reg, owner, _contract) = setup();
        let err = FlowsGroup::execute(&reg, &ctx(owner, Address::ZERO), &create("x")).unwrap_err();
        assert!(matches!(err, ContractError::Store(StoreError::NotFound(_))));
    }
}
