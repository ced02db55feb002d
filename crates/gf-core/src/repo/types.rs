//! Registros persistidos por un `FlowRegistry`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Address;

/// Instancia desplegada de `GFflowsGroup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowsGroupRecord {
    pub address: Address,
    pub name: String,
    /// Cuenta que desplegó el grupo; única autorizada a crear flows.
    pub owner: Address,
    pub created_at: DateTime<Utc>,
    pub deploy_txid: String,
}

/// Flow creado dentro de un grupo. `name` es único por grupo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub id: Uuid,
    pub group: Address,
    pub name: String,
    pub creator: Address,
    pub created_at: DateTime<Utc>,
    /// Orden de creación dentro del grupo (0, 1, ...).
    pub position: u64,
}
