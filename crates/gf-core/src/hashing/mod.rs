//! Módulo de hashing y canonicalización JSON.
//!
//! Se usa para derivar direcciones (cuentas y contratos) y txids de forma
//! determinista.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use hash::{hash_bytes, hash_str, hash_value};
