//! Tipos de evento emitidos por contratos y registro de transacciones.
//!
//! Rol en la cadena:
//! - Cada transacción confirmada puede emitir eventos (`ContractEvent`); el
//!   receipt los agrupa por nombre en un `EventDict`.
//! - Los eventos confirmados se guardan en un `EventStore` append-only
//!   (`LoggedEvent`), junto al historial de transacciones (`TxRecord`).
//! - Las transacciones revertidas quedan en el historial pero no emiten
//!   eventos.
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{FIELD_CREATOR_ADDR, FIELD_NAME_STR, FLOW_CREATED_EVENT, FLOW_CREATED_SIGNATURE};
use crate::errors::StoreError;
use crate::model::{decode_string, encode_string, event_topic, from_hex, to_hex, AbiError, Address};

/// Evento emitido por un contrato, con sus campos en orden de declaración.
///
/// Los campos se guardan como JSON: direcciones como hex `0x...` y bytes
/// crudos también como hex. No se decodifican aquí; para eso existen las
/// vistas tipadas (`FlowCreated`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEvent {
    pub name: String,
    /// Contrato que emitió el evento.
    pub address: Address,
    /// sha256 de la firma canónica del evento.
    pub topic: String,
    pub fields: IndexMap<String, Value>,
}

impl ContractEvent {
    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.fields.keys().map(|k| k.as_str()).collect()
    }
}

/// Vista tipada del evento `FlowCreated(address creatorAddr, string nameStr)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowCreated {
    pub creator_addr: Address,
    /// Nombre del flow en forma cruda (ver `model::abi`).
    pub name_str: Vec<u8>,
}

impl FlowCreated {
    pub fn new(creator_addr: Address, name: &str) -> Self {
        Self { creator_addr, name_str: encode_string(name) }
    }

    /// Decodifica `name_str` al nombre original del flow.
    pub fn name(&self) -> Result<String, AbiError> {
        decode_string(&self.name_str)
    }

    /// Convierte la vista tipada en el evento genérico emitido por `contract`.
    pub fn into_event(self, contract: Address) -> ContractEvent {
        let mut fields = IndexMap::new();
        fields.insert(FIELD_CREATOR_ADDR.to_string(), Value::String(self.creator_addr.to_hex()));
        fields.insert(FIELD_NAME_STR.to_string(), Value::String(to_hex(&self.name_str)));
        ContractEvent { name: FLOW_CREATED_EVENT.to_string(),
                        address: contract,
                        topic: event_topic(FLOW_CREATED_SIGNATURE),
                        fields }
    }
}

impl TryFrom<&ContractEvent> for FlowCreated {
    type Error = AbiError;

    fn try_from(event: &ContractEvent) -> Result<Self, Self::Error> {
        if event.name != FLOW_CREATED_EVENT {
            return Err(AbiError::UnexpectedEvent(event.name.clone()));
        }
        let field = |key: &str| -> Result<&str, AbiError> {
            event.get(key)
                 .and_then(Value::as_str)
                 .ok_or_else(|| AbiError::MissingField(key.to_string()))
        };
        let creator_addr = field(FIELD_CREATOR_ADDR)?.parse::<Address>()
                                                      .map_err(|e| AbiError::InvalidHex(e.to_string()))?;
        let name_str = from_hex(field(FIELD_NAME_STR)?)?;
        Ok(Self { creator_addr, name_str })
    }
}

/// Eventos de una transacción agrupados por nombre (orden de emisión).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDict {
    inner: IndexMap<String, Vec<ContractEvent>>,
}

impl EventDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ContractEvent) {
        self.inner.entry(event.name.clone()).or_default().push(event);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Primer evento con ese nombre.
    pub fn get(&self, name: &str) -> Option<&ContractEvent> {
        self.inner.get(name).and_then(|v| v.first())
    }

    pub fn all(&self, name: &str) -> &[ContractEvent] {
        self.inner.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn count(&self, name: &str) -> usize {
        self.all(name).len()
    }

    /// Total de eventos (todos los nombres).
    pub fn len(&self) -> usize {
        self.inner.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<&str> {
        self.inner.keys().map(|k| k.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContractEvent> {
        self.inner.values().flatten()
    }
}

impl FromIterator<ContractEvent> for EventDict {
    fn from_iter<I: IntoIterator<Item = ContractEvent>>(iter: I) -> Self {
        let mut dict = EventDict::new();
        for ev in iter {
            dict.push(ev);
        }
        dict
    }
}

/// Evento confirmado tal como queda en el `EventStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub seq: u64, // asignado por el store (orden de append)
    pub txid: String,
    pub block_number: u64,
    pub event: ContractEvent,
    pub ts: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TxStatus {
    Confirmed,
    Reverted { reason: String },
}

impl TxStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, TxStatus::Confirmed)
    }

    /// Forma corta estable ("confirmed" / "reverted").
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Confirmed => "confirmed",
            TxStatus::Reverted { .. } => "reverted",
        }
    }

    /// Reconstruye el estado a partir de su forma corta y el motivo
    /// opcional.
    pub fn from_parts(status: &str, reason: Option<String>) -> Result<Self, StoreError> {
        match status {
            "confirmed" => Ok(TxStatus::Confirmed),
            "reverted" => Ok(TxStatus::Reverted { reason: reason.unwrap_or_default() }),
            other => Err(StoreError::Serialization(format!("unknown tx status '{other}'"))),
        }
    }
}

/// Entrada del historial de transacciones (confirmadas y revertidas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    pub txid: String,
    pub block_number: u64,
    pub sender: Address,
    pub contract: Address,
    pub method: String,
    pub status: TxStatus,
    pub ts: DateTime<Utc>,
}
