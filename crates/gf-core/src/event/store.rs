use chrono::Utc;

use super::{ContractEvent, LoggedEvent, TxRecord};
use crate::errors::StoreError;
use crate::model::Address;

/// Almacenamiento append-only de eventos confirmados e historial de
/// transacciones.
///
/// Contrato:
/// - `append` asigna `seq` creciente y `ts`; nunca se actualiza ni borra.
/// - `list` devuelve los eventos de un contrato en orden ascendente por `seq`.
/// - `latest_block` es el mayor `block_number` registrado (0 si no hay
///   transacciones).
pub trait EventStore {
    fn append(&mut self, txid: &str, block_number: u64, event: ContractEvent) -> Result<LoggedEvent, StoreError>;
    fn list(&self, contract: &Address) -> Result<Vec<LoggedEvent>, StoreError>;
    fn record_tx(&mut self, record: TxRecord) -> Result<(), StoreError>;
    /// Historial completo en orden de minado.
    fn history(&self) -> Result<Vec<TxRecord>, StoreError>;
    fn latest_block(&self) -> Result<u64, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: Vec<LoggedEvent>,
    txs: Vec<TxRecord>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&mut self, txid: &str, block_number: u64, event: ContractEvent) -> Result<LoggedEvent, StoreError> {
        let seq = self.events.len() as u64;
        let logged = LoggedEvent { seq, txid: txid.to_string(), block_number, event, ts: Utc::now() };
        self.events.push(logged.clone());
        Ok(logged)
    }

    fn list(&self, contract: &Address) -> Result<Vec<LoggedEvent>, StoreError> {
        Ok(self.events.iter().filter(|e| &e.event.address == contract).cloned().collect())
    }

    fn record_tx(&mut self, record: TxRecord) -> Result<(), StoreError> {
        if self.txs.iter().any(|t| t.txid == record.txid) {
            return Err(StoreError::Conflict(format!("tx {} already recorded", record.txid)));
        }
        self.txs.push(record);
        Ok(())
    }

    fn history(&self) -> Result<Vec<TxRecord>, StoreError> {
        Ok(self.txs.clone())
    }

    fn latest_block(&self) -> Result<u64, StoreError> {
        Ok(self.txs.iter().map(|t| t.block_number).max().unwrap_or(0))
    }
}
