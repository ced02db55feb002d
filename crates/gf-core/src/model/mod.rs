//! Modelos básicos: identidades (`Address`, `Accounts`) y codificación ABI
//! de los campos crudos de eventos.

pub mod abi;
pub mod address;

pub use abi::{decode_string, encode_string, event_topic, from_hex, to_hex, AbiError};
pub use address::{Accounts, Address, AddressError};
