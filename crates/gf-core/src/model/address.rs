//! Identidades de cuentas y contratos.
//!
//! Una `Address` son 20 bytes, mostrados como hex en minúsculas con prefijo
//! `0x`. Las cuentas de desarrollo se derivan de forma determinista a partir
//! de una semilla para que dos cadenas con la misma configuración expongan
//! las mismas cuentas (y por lo tanto los mismos contratos).

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::hashing::hash_bytes;
use crate::model::abi::{from_hex, to_hex, AbiError};

/// Largo en bytes de una dirección.
pub const ADDRESS_LEN: usize = 20;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AddressError {
    #[error("address must be {expected} bytes, got {got}")] InvalidLength { expected: usize, got: usize },
    #[error("invalid hex in address: {0}")] InvalidHex(String),
}

impl From<AbiError> for AddressError {
    fn from(e: AbiError) -> Self {
        Self::InvalidHex(e.to_string())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Address = Address([0; ADDRESS_LEN]);

    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Deriva una dirección: primeros 20 bytes de blake3 sobre
    /// `domain` + partes.
    pub fn derive(domain: &str, parts: &[&[u8]]) -> Self {
        let digest = hash_bytes(domain, parts);
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&digest[..ADDRESS_LEN]);
        Self(out)
    }

    /// Forma hex (`0x` + 40 dígitos).
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = from_hex(s.trim())?;
        if bytes.len() != ADDRESS_LEN {
            return Err(AddressError::InvalidLength { expected: ADDRESS_LEN, got: bytes.len() });
        }
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Cuentas desbloqueadas de la cadena de desarrollo (`accounts[0]`,
/// `accounts[1]`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accounts {
    inner: Vec<Address>,
}

impl Accounts {
    /// Deriva `count` cuentas a partir de `seed`.
    pub fn derive(seed: &str, count: usize) -> Self {
        let inner = (0..count).map(|i| Address::derive("account", &[seed.as_bytes(), &(i as u64).to_be_bytes()]))
                              .collect();
        Self { inner }
    }

    pub fn get(&self, index: usize) -> Option<Address> {
        self.inner.get(index).copied()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.inner.contains(address)
    }

    /// Posición de la cuenta dentro del set, si existe.
    pub fn index_of(&self, address: &Address) -> Option<usize> {
        self.inner.iter().position(|a| a == address)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.inner.iter()
    }
}

impl Index<usize> for Accounts {
    type Output = Address;

    fn index(&self, index: usize) -> &Self::Output {
        &self.inner[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_are_symmetric() {
        let a = Address::derive("test", &[b"x"]);
        let s = a.to_string();
        assert_eq!(s.len(), 42);
        assert!(s.starts_with("0x"));
        assert_eq!(s.parse::<Address>().unwrap(), a);
        assert_eq!(s.to_uppercase().replace("0X", "0x").parse::<Address>().unwrap(), a);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert_eq!(err, AddressError::InvalidLength { expected: 20, got: 2 });
        assert!(matches!("0xzz".parse::<Address>(), Err(AddressError::InvalidHex(_))));
    }

    #[test]
    fn accounts_are_deterministic_and_distinct() {
        let a = Accounts::derive("seed", 10);
        let b = Accounts::derive("seed", 10);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        assert_ne!(a[0], a[1]);
        assert_ne!(Accounts::derive("other", 1)[0], a[0]);
        assert_eq!(a.index_of(&a[3]), Some(3));
        assert!(a.get(10).is_none());
    }
}
