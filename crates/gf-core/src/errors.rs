//! Errores del core: reverts del contrato, errores de la cadena y de los
//! stores.
//!
//! Desde el punto de vista de quien usa la cadena existe una sola señal de
//! fallo para un revert: `ChainError::VirtualMachine`. El motivo (texto) se
//! conserva para diagnóstico pero no se clasifica.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AbiError, Address, AddressError};

/// Motivos de revert del contrato `GFflowsGroup`.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum Revert {
    #[error("only the flows group owner can perform this operation")] NotOwner,
    #[error("flow name must not be empty")] EmptyName,
    #[error("flow already exists: {0}")] FlowAlreadyExists(String),
}

/// Fallo a nivel de VM: la transacción fue minada pero revirtió.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[error("VM Exception while processing transaction: revert {reason}")]
pub struct VmError {
    /// Motivo del revert (texto libre, no clasificado).
    pub reason: String,
    /// Transacción que revirtió.
    pub txid: String,
}

/// Resultado fallido de ejecutar un método del contrato.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ContractError {
    #[error(transparent)] Revert(#[from] Revert),
    #[error(transparent)] Store(#[from] StoreError),
}

/// Errores de almacenamiento (registro de flows / log de eventos).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    #[error("not found: {0}")] NotFound(String),
    #[error("conflict: {0}")] Conflict(String),
    #[error("storage error: {0}")] Storage(String),
    #[error("serialization error: {0}")] Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Errores devueltos por la cadena de desarrollo.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Revert del contrato. Única señal de fallo observable para el caller.
    #[error(transparent)]
    VirtualMachine(#[from] VmError),
    #[error("account {0} is not an unlocked account of this chain")]
    UnknownAccount(Address),
    #[error("no contract deployed at {0}")]
    UnknownContract(Address),
    #[error("contract has no method named '{0}'")]
    UnknownMethod(String),
    #[error("invalid arguments for '{method}': {detail}")]
    InvalidArguments { method: String, detail: String },
    #[error("invalid chain configuration: {0}")]
    InvalidConfig(String),
    #[error("method '{0}' returned an unexpected value")]
    UnexpectedOutput(String),
    #[error(transparent)]
    Abi(#[from] AbiError),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
}

impl ChainError {
    /// `true` si el error es un revert de la VM.
    pub fn is_vm_error(&self) -> bool {
        matches!(self, ChainError::VirtualMachine(_))
    }
}

/// Alias de resultado usado por la API de la cadena.
pub type Result<T> = std::result::Result<T, ChainError>;
