use super::{Chain, TransactionReceipt, TxOptions};
use crate::contract::{FlowsGroupCall, FlowsGroupQuery, QueryOutput};
use crate::errors::{ChainError, Result};
use crate::event::EventStore;
use crate::model::Address;
use crate::repo::{FlowRegistry, FlowsGroupRecord};

/// Handle a una instancia desplegada de `GFflowsGroup`.
///
/// No guarda referencia a la cadena: cada método recibe la `Chain` sobre la
/// que opera, de modo que el handle puede copiarse libremente entre tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowsGroupHandle {
    pub address: Address,
    pub name: String,
    pub owner: Address,
    pub deploy_txid: String,
}

impl FlowsGroupHandle {
    pub(crate) fn from_record(record: &FlowsGroupRecord) -> Self {
        Self { address: record.address,
               name: record.name.clone(),
               owner: record.owner,
               deploy_txid: record.deploy_txid.clone() }
    }

    /// `createFlow(name)`.
    pub fn create_flow<R, E>(&self,
                             chain: &mut Chain<R, E>,
                             name: &str,
                             opts: impl Into<TxOptions>)
                             -> Result<TransactionReceipt>
        where R: FlowRegistry,
              E: EventStore
    {
        chain.transact(&self.address, FlowsGroupCall::CreateFlow { name: name.to_string() }, opts)
    }

    /// `getAllFlowNames()`.
    pub fn get_all_flow_names<R, E>(&self, chain: &Chain<R, E>) -> Result<Vec<String>>
        where R: FlowRegistry,
              E: EventStore
    {
        let query = FlowsGroupQuery::GetAllFlowNames;
        chain.call(&self.address, &query)?
             .into_names()
             .ok_or_else(|| ChainError::UnexpectedOutput(query.method_name().into()))
    }

    /// `getName()`.
    pub fn get_name<R, E>(&self, chain: &Chain<R, E>) -> Result<String>
        where R: FlowRegistry,
              E: EventStore
    {
        let query = FlowsGroupQuery::GetName;
        expect_output(chain.call(&self.address, &query)?, &query, |o| o.as_text().map(str::to_string))
    }

    /// `getOwner()`.
    pub fn get_owner<R, E>(&self, chain: &Chain<R, E>) -> Result<Address>
        where R: FlowRegistry,
              E: EventStore
    {
        let query = FlowsGroupQuery::GetOwner;
        expect_output(chain.call(&self.address, &query)?, &query, QueryOutput::as_address)
    }

    /// `flowExists(name)`.
    pub fn flow_exists<R, E>(&self, chain: &Chain<R, E>, name: &str) -> Result<bool>
        where R: FlowRegistry,
              E: EventStore
    {
        let query = FlowsGroupQuery::FlowExists { name: name.to_string() };
        expect_output(chain.call(&self.address, &query)?, &query, QueryOutput::as_bool)
    }

    /// `getFlowsCount()`.
    pub fn flows_count<R, E>(&self, chain: &Chain<R, E>) -> Result<u64>
        where R: FlowRegistry,
              E: EventStore
    {
        let query = FlowsGroupQuery::GetFlowsCount;
        expect_output(chain.call(&self.address, &query)?, &query, QueryOutput::as_count)
    }
}

fn expect_output<T>(out: QueryOutput, query: &FlowsGroupQuery, pick: impl Fn(&QueryOutput) -> Option<T>) -> Result<T> {
    pick(&out).ok_or_else(|| ChainError::UnexpectedOutput(query.method_name().into()))
}
