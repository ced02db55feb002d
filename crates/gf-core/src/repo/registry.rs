use std::collections::HashMap;

use indexmap::IndexMap;

use super::{FlowRecord, FlowsGroupRecord};
use crate::errors::StoreError;
use crate::model::Address;

/// Contrato mínimo del almacenamiento de grupos y flows.
///
/// Invariantes que toda implementación debe respetar:
/// - `insert_group` falla con `Conflict` si la dirección ya existe.
/// - `insert_flow` falla con `NotFound` si el grupo no existe y con
///   `Conflict` si el nombre ya existe dentro del grupo.
/// - `flow_names` devuelve los nombres en orden de creación.
pub trait FlowRegistry {
    fn insert_group(&mut self, group: &FlowsGroupRecord) -> Result<(), StoreError>;
    fn group(&self, address: &Address) -> Result<Option<FlowsGroupRecord>, StoreError>;
    /// Cantidad de grupos desplegados por `owner` (nonce de despliegue).
    fn groups_deployed_by(&self, owner: &Address) -> Result<u64, StoreError>;
    fn insert_flow(&mut self, flow: &FlowRecord) -> Result<(), StoreError>;
    fn flow(&self, group: &Address, name: &str) -> Result<Option<FlowRecord>, StoreError>;
    fn flow_names(&self, group: &Address) -> Result<Vec<String>, StoreError>;
    fn flow_count(&self, group: &Address) -> Result<u64, StoreError>;
}

/// Registro en memoria (no durable): cada grupo guarda sus flows en un
/// `IndexMap` para preservar el orden de inserción.
#[derive(Debug, Default)]
pub struct InMemoryFlowRegistry {
    groups: HashMap<Address, FlowsGroupRecord>,
    flows: HashMap<Address, IndexMap<String, FlowRecord>>,
}

impl InMemoryFlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlowRegistry for InMemoryFlowRegistry {
    fn insert_group(&mut self, group: &FlowsGroupRecord) -> Result<(), StoreError> {
        if self.groups.contains_key(&group.address) {
            return Err(StoreError::Conflict(format!("group {} already exists", group.address)));
        }
        self.groups.insert(group.address, group.clone());
        self.flows.insert(group.address, IndexMap::new());
        Ok(())
    }

    fn group(&self, address: &Address) -> Result<Option<FlowsGroupRecord>, StoreError> {
        Ok(self.groups.get(address).cloned())
    }

    fn groups_deployed_by(&self, owner: &Address) -> Result<u64, StoreError> {
        Ok(self.groups.values().filter(|g| &g.owner == owner).count() as u64)
    }

    fn insert_flow(&mut self, flow: &FlowRecord) -> Result<(), StoreError> {
        let flows = self.flows
                        .get_mut(&flow.group)
                        .ok_or_else(|| StoreError::NotFound(format!("group {}", flow.group)))?;
        if flows.contains_key(&flow.name) {
            return Err(StoreError::Conflict(format!("flow '{}' already exists in {}", flow.name, flow.group)));
        }
        flows.insert(flow.name.clone(), flow.clone());
        Ok(())
    }

    fn flow(&self, group: &Address, name: &str) -> Result<Option<FlowRecord>, StoreError> {
        Ok(self.flows.get(group).and_then(|f| f.get(name)).cloned())
    }

    fn flow_names(&self, group: &Address) -> Result<Vec<String>, StoreError> {
        Ok(self.flows.get(group).map(|f| f.keys().cloned().collect()).unwrap_or_default())
    }

    fn flow_count(&self, group: &Address) -> Result<u64, StoreError> {
        Ok(self.flows.get(group).map(|f| f.len() as u64).unwrap_or(0))
    }
}
