//! gf-core: cadena de desarrollo determinista y contrato `GFflowsGroup`.
//!
//! Un `GFflowsGroup` es un registro de flows con nombre. Sólo su owner (la
//! cuenta que lo desplegó) puede crear flows; cada creación emite un
//! `FlowCreated` con el creador y el nombre codificado.
pub mod chain;
pub mod constants;
pub mod contract;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod repo;

pub use chain::{Chain, ChainConfig, FlowsGroupHandle, TransactionReceipt, TxOptions};
pub use contract::{FlowsGroupCall, FlowsGroupQuery, QueryOutput};
pub use errors::{ChainError, Revert, StoreError, VmError};
pub use event::{ContractEvent, EventDict, EventStore, FlowCreated, InMemoryEventStore, LoggedEvent, TxRecord, TxStatus};
pub use model::{Accounts, Address};
pub use repo::{FlowRecord, FlowRegistry, FlowsGroupRecord, InMemoryFlowRegistry};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_ops_on_default_chain() {
        let mut chain = Chain::new();
        let owner = chain.accounts()[0];
        let group = chain.deploy_flows_group("test_flows", owner).expect("deploy");

        let receipt = group.create_flow(&mut chain, "test_flow_01", owner).expect("owner creates flow");
        let ev = receipt.events.get("FlowCreated").expect("FlowCreated emitted");
        assert!(ev.contains_key("creatorAddr"));
        assert!(ev.contains_key("nameStr"));

        let other = chain.accounts()[1];
        let err = group.create_flow(&mut chain, "test_flow_02", other).unwrap_err();
        assert!(err.is_vm_error());

        assert_eq!(group.get_all_flow_names(&chain).unwrap(), vec!["test_flow_01"]);
    }
}
