//! Hash helpers (blake3) usados para derivar direcciones y txids.

use blake3::Hasher;
use serde_json::Value;

use super::to_canonical_json;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hashea una secuencia de partes separadas por dominio y devuelve los 32
/// bytes crudos. Cada parte se prefija con su longitud para que
/// `["ab", "c"]` y `["a", "bc"]` no colisionen.
pub fn hash_bytes(domain: &str, parts: &[&[u8]]) -> [u8; 32] {
    let mut h = Hasher::new();
    h.update(domain.as_bytes());
    for p in parts {
        h.update(&(p.len() as u64).to_be_bytes());
        h.update(p);
    }
    *h.finalize().as_bytes()
}

/// Hashea la forma canónica de un valor JSON (orden de claves estable).
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_are_length_prefixed() {
        assert_ne!(hash_bytes("d", &[b"ab", b"c"]), hash_bytes("d", &[b"a", b"bc"]));
        assert_ne!(hash_bytes("d1", &[b"x"]), hash_bytes("d2", &[b"x"]));
        assert_eq!(hash_bytes("d", &[b"x"]), hash_bytes("d", &[b"x"]));
    }

    #[test]
    fn value_hash_ignores_key_order() {
        let a = serde_json::json!({"a": 1, "b": [1, 2]});
        let b = serde_json::json!({"b": [1, 2], "a": 1});
        assert_eq!(hash_value(&a), hash_value(&b));
        assert_eq!(hash_value(&a).len(), 64);
    }
}
