use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::EventDict;
use crate::model::Address;

/// Receipt de una transacción confirmada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub txid: String,
    pub block_number: u64,
    pub sender: Address,
    pub contract: Address,
    pub method: String,
    /// Eventos emitidos, agrupados por nombre.
    pub events: EventDict,
    pub timestamp: DateTime<Utc>,
}
