//! Implementación de `Chain`.

use chrono::Utc;
use log::{debug, error, info, warn};
use serde_json::json;

use super::{ChainConfig, FlowsGroupHandle, TransactionReceipt};
use crate::constants::{CHAIN_VERSION, FLOWS_GROUP_CONTRACT};
use crate::contract::{CallContext, FlowsGroup, FlowsGroupCall, FlowsGroupQuery, QueryOutput};
use crate::errors::{ChainError, ContractError, Result, StoreError, VmError};
use crate::event::{EventDict, EventStore, InMemoryEventStore, LoggedEvent, TxRecord, TxStatus};
use crate::hashing::hash_value;
use crate::model::{Accounts, Address};
use crate::repo::{FlowRegistry, InMemoryFlowRegistry};

/// Nombre de "método" con el que se registra un despliegue en el historial.
const CONSTRUCTOR: &str = "constructor";

/// Opciones de transacción (equivalente a `{'from': account}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    pub from: Address,
}

impl From<Address> for TxOptions {
    fn from(from: Address) -> Self {
        Self { from }
    }
}

/// Cadena de desarrollo: cuentas, registro de contratos y log de eventos.
///
/// Cada transacción (despliegue o método que modifica estado) se mina en su
/// propio bloque. Una transacción revertida consume bloque y queda en el
/// historial, pero no altera el registro ni emite eventos.
#[derive(Debug)]
pub struct Chain<R = InMemoryFlowRegistry, E = InMemoryEventStore>
    where R: FlowRegistry,
          E: EventStore
{
    config: ChainConfig,
    accounts: Accounts,
    registry: R,
    event_store: E,
    block_number: u64,
}

impl Chain<InMemoryFlowRegistry, InMemoryEventStore> {
    /// Cadena en memoria con la configuración por defecto.
    pub fn new() -> Self {
        Self::with_config(ChainConfig::default())
    }

    /// Cadena en memoria con configuración explícita.
    pub fn with_config(config: ChainConfig) -> Self {
        let accounts = Accounts::derive(&config.account_seed, config.account_count);
        Self { config,
               accounts,
               registry: InMemoryFlowRegistry::new(),
               event_store: InMemoryEventStore::new(),
               block_number: 0 }
    }
}

impl Default for Chain<InMemoryFlowRegistry, InMemoryEventStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, E> Chain<R, E>
    where R: FlowRegistry,
          E: EventStore
{
    /// Crea la cadena sobre stores provistos (por ejemplo Postgres). La altura
    /// inicial se toma del último bloque registrado en `event_store`.
    pub fn new_with_stores(config: ChainConfig, registry: R, event_store: E) -> Result<Self> {
        let accounts = Accounts::derive(&config.account_seed, config.account_count);
        let block_number = event_store.latest_block()?;
        Ok(Self { config, accounts, registry, event_store, block_number })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    /// Altura actual (último bloque minado).
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Despliega una nueva instancia de `GFflowsGroup` con `name`. El sender
    /// queda como owner.
    pub fn deploy_flows_group(&mut self, name: &str, opts: impl Into<TxOptions>) -> Result<FlowsGroupHandle> {
        let opts = opts.into();
        self.ensure_account(&opts.from)?;
        let nonce = self.registry.groups_deployed_by(&opts.from)?;
        let address = Address::derive("contract", &[opts.from.as_bytes(), &nonce.to_be_bytes()]);
        let block = self.block_number + 1;
        let txid = self.txid(block, &opts.from, &address, json!({"method": CONSTRUCTOR, "name": name}));
        let ctx = CallContext { sender: opts.from, contract: address, txid: txid.clone(), timestamp: Utc::now() };

        let record = FlowsGroup::init(&ctx, name);
        self.registry.insert_group(&record)?;
        self.event_store.record_tx(TxRecord { txid: txid.clone(),
                                              block_number: block,
                                              sender: opts.from,
                                              contract: address,
                                              method: CONSTRUCTOR.to_string(),
                                              status: TxStatus::Confirmed,
                                              ts: ctx.timestamp })?;
        self.block_number = block;
        info!("deploy {} name={} address={} owner={} block={}",
              FLOWS_GROUP_CONTRACT, name, address, opts.from, block);
        Ok(FlowsGroupHandle::from_record(&record))
    }

    /// Obtiene un handle para un grupo ya desplegado.
    pub fn flows_group_at(&self, address: &Address) -> Result<FlowsGroupHandle> {
        let record = self.registry.group(address)?.ok_or(ChainError::UnknownContract(*address))?;
        Ok(FlowsGroupHandle::from_record(&record))
    }

    /// Envía una transacción a `contract`.
    ///
    /// - `Ok(receipt)` si el método se ejecutó; el receipt lleva los eventos.
    /// - `Err(ChainError::VirtualMachine)` si el contrato revirtió.
    pub fn transact(&mut self,
                    contract: &Address,
                    call: FlowsGroupCall,
                    opts: impl Into<TxOptions>)
                    -> Result<TransactionReceipt> {
        let opts = opts.into();
        self.ensure_account(&opts.from)?;
        self.ensure_contract(contract)?;
        let method = call.method_name().to_string();
        let block = self.block_number + 1;
        let payload = serde_json::to_value(&call).map_err(StoreError::from)?;
        let txid = self.txid(block, &opts.from, contract, payload);
        let ctx = CallContext { sender: opts.from, contract: *contract, txid: txid.clone(), timestamp: Utc::now() };
        debug!("transact:start txid={} method={} contract={} from={}", txid, method, contract, opts.from);

        let effects = match FlowsGroup::execute(&self.registry, &ctx, &call) {
            Ok(effects) => effects,
            Err(ContractError::Revert(revert)) => {
                let reason = revert.to_string();
                self.event_store.record_tx(TxRecord { txid: txid.clone(),
                                                      block_number: block,
                                                      sender: opts.from,
                                                      contract: *contract,
                                                      method: method.clone(),
                                                      status: TxStatus::Reverted { reason: reason.clone() },
                                                      ts: ctx.timestamp })?;
                self.block_number = block;
                warn!("transact:revert txid={} method={} from={} reason={}", txid, method, opts.from, reason);
                return Err(VmError { reason, txid }.into());
            }
            Err(ContractError::Store(e)) => return Err(e.into()),
        };

        effects.apply(&mut self.registry)?;
        // Desde aquí el registro ya cambió: un fallo deja el flow sin evento
        // o sin entrada en el historial.
        let mut events = EventDict::new();
        for ev in effects.events {
            let logged = self.event_store.append(&txid, block, ev).inspect_err(|e| {
                                                                        error!("transact:partial txid={} stage=append err={}", txid, e)
                                                                    })?;
            events.push(logged.event);
        }
        self.event_store
            .record_tx(TxRecord { txid: txid.clone(),
                                  block_number: block,
                                  sender: opts.from,
                                  contract: *contract,
                                  method: method.clone(),
                                  status: TxStatus::Confirmed,
                                  ts: ctx.timestamp })
            .inspect_err(|e| error!("transact:partial txid={} stage=record_tx err={}", txid, e))?;
        self.block_number = block;
        debug!("transact:done txid={} block={} events={}", txid, block, events.len());
        Ok(TransactionReceipt { txid,
                                block_number: block,
                                sender: opts.from,
                                contract: *contract,
                                method,
                                events,
                                timestamp: ctx.timestamp })
    }

    /// Consulta de sólo lectura: no mina bloque ni queda en el historial.
    pub fn call(&self, contract: &Address, query: &FlowsGroupQuery) -> Result<QueryOutput> {
        self.ensure_contract(contract)?;
        Ok(FlowsGroup::query(&self.registry, contract, query)?)
    }

    /// Eventos confirmados emitidos por `contract`, en orden.
    pub fn events_for(&self, contract: &Address) -> Result<Vec<LoggedEvent>> {
        Ok(self.event_store.list(contract)?)
    }

    /// Historial de transacciones (confirmadas y revertidas).
    pub fn history(&self) -> Result<Vec<TxRecord>> {
        Ok(self.event_store.history()?)
    }

    fn ensure_account(&self, address: &Address) -> Result<()> {
        if self.accounts.contains(address) {
            Ok(())
        } else {
            Err(ChainError::UnknownAccount(*address))
        }
    }

    fn ensure_contract(&self, address: &Address) -> Result<()> {
        match self.registry.group(address)? {
            Some(_) => Ok(()),
            None => Err(ChainError::UnknownContract(*address)),
        }
    }

    /// txid determinista: hash de la forma canónica de la transacción. El
    /// número de bloque lo hace único dentro de la cadena.
    fn txid(&self, block: u64, sender: &Address, contract: &Address, payload: serde_json::Value) -> String {
        let tx = json!({
            "chain": CHAIN_VERSION,
            "seed": self.config.account_seed,
            "block": block,
            "from": sender,
            "to": contract,
            "payload": payload,
        });
        format!("0x{}", hash_value(&tx))
    }
}
