use chrono::{DateTime, Utc};
use diesel::prelude::*;
use gf_core::errors::StoreError;
use gf_core::event::{ContractEvent, EventStore, LoggedEvent, TxRecord, TxStatus};
use gf_core::model::Address;
use log::{debug, error};
use serde_json::Value;

use super::{parse_address, to_i64, to_u64, with_retry, ConnectionProvider};
use crate::error::PersistenceError;
use crate::schema::{chain_transactions, contract_events};

/// Inserción en `contract_events`; `seq` y `ts` vuelven vía `RETURNING`.
#[derive(Insertable, Debug)]
#[diesel(table_name = contract_events)]
struct NewEventRow<'a> {
    txid: &'a str,
    block_number: i64,
    contract: &'a str,
    event_name: &'a str,
    payload: &'a Value,
}

/// Lectura de `contract_events`. `payload` guarda el `ContractEvent`
/// completo; `contract` y `event_name` existen para filtrar sin abrir el JSON.
#[derive(Queryable, Debug)]
struct EventRow {
    seq: i64,
    txid: String,
    block_number: i64,
    payload: Value,
    ts: DateTime<Utc>,
}

impl EventRow {
    fn into_logged(self) -> Result<LoggedEvent, PersistenceError> {
        let event: ContractEvent = serde_json::from_value(self.payload)?;
        Ok(LoggedEvent { seq: to_u64("seq", self.seq)?,
                         txid: self.txid,
                         block_number: to_u64("block_number", self.block_number)?,
                         event,
                         ts: self.ts })
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = chain_transactions)]
struct NewTxRow<'a> {
    txid: &'a str,
    block_number: i64,
    sender: &'a str,
    contract: &'a str,
    method: &'a str,
    status: &'a str,
    reason: Option<&'a str>,
    ts: DateTime<Utc>,
}

#[derive(Queryable, Debug)]
struct TxRow {
    txid: String,
    block_number: i64,
    sender: String,
    contract: String,
    method: String,
    status: String,
    reason: Option<String>,
    ts: DateTime<Utc>,
}

impl TxRow {
    fn into_record(self) -> Result<TxRecord, PersistenceError> {
        let status = TxStatus::from_parts(&self.status, self.reason)
            .map_err(|e| PersistenceError::Decode(e.to_string()))?;
        Ok(TxRecord { txid: self.txid,
                      block_number: to_u64("block_number", self.block_number)?,
                      sender: parse_address("sender", &self.sender)?,
                      contract: parse_address("contract", &self.contract)?,
                      method: self.method,
                      status,
                      ts: self.ts })
    }
}

/// Implementación Postgres de `EventStore` (append-only).
///
/// - `append`: inserta el evento; el `seq` lo asigna la DB (BIGSERIAL).
/// - `list`: eventos de un contrato ordenados por `seq`.
/// - `record_tx` / `history`: historial en `chain_transactions`, ordenado por
///   bloque.
pub struct PgEventStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgEventStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> EventStore for PgEventStore<P> {
    fn append(&mut self, txid: &str, block_number: u64, event: ContractEvent) -> Result<LoggedEvent, StoreError> {
        debug!("append:start txid={} event={} contract={}", txid, event.name, event.address);
        let payload = serde_json::to_value(&event)?;
        let contract = event.address.to_hex();
        let block = to_i64("block_number", block_number)?;
        let (seq, ts): (i64, DateTime<Utc>) = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(contract_events::table).values(NewEventRow { txid,
                                                                              block_number: block,
                                                                              contract: &contract,
                                                                              event_name: &event.name,
                                                                              payload: &payload })
                                                        .returning((contract_events::seq, contract_events::ts))
                                                        .get_result(&mut conn)
                                                        .map_err(PersistenceError::from)
        })?;
        let logged = LoggedEvent { seq: to_u64("seq", seq)?,
                                   txid: txid.to_string(),
                                   block_number,
                                   event,
                                   ts };
        debug!("append:done txid={} seq={}", txid, logged.seq);
        Ok(logged)
    }

    fn list(&self, contract: &Address) -> Result<Vec<LoggedEvent>, StoreError> {
        let key = contract.to_hex();
        debug!("list:start contract={}", key);
        let rows: Vec<EventRow> = with_retry(|| {
                                      let mut conn = self.provider.connection()?;
                                      contract_events::table.filter(contract_events::contract.eq(&key))
                                                            .order(contract_events::seq.asc())
                                                            .select((contract_events::seq,
                                                                     contract_events::txid,
                                                                     contract_events::block_number,
                                                                     contract_events::payload,
                                                                     contract_events::ts))
                                                            .load(&mut conn)
                                                            .map_err(PersistenceError::from)
                                  }).inspect_err(|e| error!("list:load error contract={} err={:?}", key, e))?;
        let events = rows.into_iter().map(EventRow::into_logged).collect::<Result<Vec<_>, _>>()?;
        debug!("list:done contract={} count={}", key, events.len());
        Ok(events)
    }

    fn record_tx(&mut self, record: TxRecord) -> Result<(), StoreError> {
        let sender = record.sender.to_hex();
        let contract = record.contract.to_hex();
        let block = to_i64("block_number", record.block_number)?;
        let reason = match &record.status {
            TxStatus::Confirmed => None,
            TxStatus::Reverted { reason } => Some(reason.as_str()),
        };
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(chain_transactions::table).values(NewTxRow { txid: &record.txid,
                                                                              block_number: block,
                                                                              sender: &sender,
                                                                              contract: &contract,
                                                                              method: &record.method,
                                                                              status: record.status.as_str(),
                                                                              reason,
                                                                              ts: record.ts })
                                                           .execute(&mut conn)
                                                           .map_err(PersistenceError::from)
        })?;
        debug!("record_tx txid={} status={}", record.txid, record.status.as_str());
        Ok(())
    }

    fn history(&self) -> Result<Vec<TxRecord>, StoreError> {
        let rows: Vec<TxRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            chain_transactions::table.order((chain_transactions::block_number.asc(), chain_transactions::ts.asc()))
                                     .load(&mut conn)
                                     .map_err(PersistenceError::from)
        })?;
        Ok(rows.into_iter().map(TxRow::into_record).collect::<Result<Vec<_>, _>>()?)
    }

    fn latest_block(&self) -> Result<u64, StoreError> {
        let max: Option<i64> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            chain_transactions::table.select(diesel::dsl::max(chain_transactions::block_number))
                                     .first(&mut conn)
                                     .map_err(PersistenceError::from)
        })?;
        Ok(max.map(|b| to_u64("block_number", b)).transpose()?.unwrap_or(0))
    }
}
