//! Codificación cruda de strings en eventos (estilo ABI).
//!
//! Formato de `encode_string`:
//! - palabra de 32 bytes big-endian con la longitud en bytes del UTF-8;
//! - los bytes UTF-8, rellenados con ceros a la derecha hasta múltiplo de 32.
//!
//! Los eventos transportan el campo `nameStr` en esta forma (como hex
//! `0x...`); `decode_string` permite recuperar el valor para compararlo.

use std::fmt::Write;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::constants::ABI_WORD_SIZE;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AbiError {
    #[error("encoded data too short: {0} bytes")] TooShort(usize),
    #[error("declared length {declared} exceeds available {available} bytes")] LengthOverflow { declared: u128, available: usize },
    #[error("non-zero padding after string data")] DirtyPadding,
    #[error("string data is not valid UTF-8")] InvalidUtf8,
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("unexpected event: {0}")] UnexpectedEvent(String),
    #[error("missing event field: {0}")] MissingField(String),
}

/// Codifica un string en su forma cruda (longitud + datos con padding).
pub fn encode_string(value: &str) -> Vec<u8> {
    let data = value.as_bytes();
    let padded = data.len().div_ceil(ABI_WORD_SIZE) * ABI_WORD_SIZE;
    let mut out = Vec::with_capacity(ABI_WORD_SIZE + padded);
    let mut word = [0u8; ABI_WORD_SIZE];
    word[ABI_WORD_SIZE - 16..].copy_from_slice(&(data.len() as u128).to_be_bytes());
    out.extend_from_slice(&word);
    out.extend_from_slice(data);
    out.resize(ABI_WORD_SIZE + padded, 0);
    out
}

/// Decodifica un string producido por `encode_string`.
pub fn decode_string(raw: &[u8]) -> Result<String, AbiError> {
    if raw.len() < ABI_WORD_SIZE {
        return Err(AbiError::TooShort(raw.len()));
    }
    let (word, rest) = raw.split_at(ABI_WORD_SIZE);
    // Los 16 bytes altos deben ser cero: ningún string real los necesita.
    if word[..ABI_WORD_SIZE - 16].iter().any(|b| *b != 0) {
        return Err(AbiError::LengthOverflow { declared: u128::MAX, available: rest.len() });
    }
    let mut len_bytes = [0u8; 16];
    len_bytes.copy_from_slice(&word[ABI_WORD_SIZE - 16..]);
    let declared = u128::from_be_bytes(len_bytes);
    if declared > rest.len() as u128 {
        return Err(AbiError::LengthOverflow { declared, available: rest.len() });
    }
    let len = declared as usize;
    let (data, padding) = rest.split_at(len);
    if padding.iter().any(|b| *b != 0) {
        return Err(AbiError::DirtyPadding);
    }
    String::from_utf8(data.to_vec()).map_err(|_| AbiError::InvalidUtf8)
}

/// Bytes a hex en minúsculas con prefijo `0x`.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(2 + bytes.len() * 2);
    s.push_str("0x");
    for b in bytes {
        // escribir en un String no falla
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// Hex (prefijo `0x` opcional, mayúsculas o minúsculas) a bytes.
pub fn from_hex(input: &str) -> Result<Vec<u8>, AbiError> {
    let digits = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AbiError::InvalidHex(input.to_string()));
    }
    if digits.len() % 2 != 0 {
        return Err(AbiError::InvalidHex(format!("odd number of digits in '{input}'")));
    }
    (0..digits.len()).step_by(2)
                     .map(|i| {
                         digits.get(i..i + 2)
                               .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                               .ok_or_else(|| AbiError::InvalidHex(input.to_string()))
                     })
                     .collect()
}

/// Topic de un evento: sha256 (hex con `0x`) de su firma canónica.
pub fn event_topic(signature: &str) -> String {
    let digest = Sha256::digest(signature.as_bytes());
    to_hex(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_layout_is_word_aligned() {
        let raw = encode_string("test_flow_01");
        assert_eq!(raw.len(), 64);
        assert_eq!(raw[31], 12);
        assert_eq!(&raw[32..44], b"test_flow_01");
        assert!(raw[44..].iter().all(|b| *b == 0));
        assert_eq!(encode_string("").len(), 32);
    }

    #[test]
    fn decode_recovers_multibyte_names() {
        let name = "flujo_ñandú_✓";
        assert_eq!(decode_string(&encode_string(name)).unwrap(), name);
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert_eq!(decode_string(&[0u8; 10]), Err(AbiError::TooShort(10)));

        let mut raw = encode_string("abc");
        raw[31] = 200;
        assert!(matches!(decode_string(&raw), Err(AbiError::LengthOverflow { declared: 200, .. })));

        let mut raw = encode_string("abc");
        raw[40] = 1;
        assert_eq!(decode_string(&raw), Err(AbiError::DirtyPadding));

        let mut raw = encode_string("ab");
        raw[32] = 0xff;
        assert_eq!(decode_string(&raw), Err(AbiError::InvalidUtf8));
    }

    #[test]
    fn hex_helpers() {
        assert_eq!(to_hex(&[0, 171, 255]), "0x00abff");
        assert_eq!(from_hex("0x00ABff").unwrap(), vec![0, 171, 255]);
        assert_eq!(from_hex("00abff").unwrap(), vec![0, 171, 255]);
        assert!(from_hex("0xabc").is_err());
        assert!(from_hex("0xgg").is_err());
    }

    #[test]
    fn hex_of_long_buffer_is_exact() {
        let raw: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let hex = to_hex(&raw);
        assert_eq!(hex.len(), 2 + raw.len() * 2);
        assert!(hex.starts_with("0x000102"));
        assert_eq!(from_hex(&hex).unwrap(), raw);
    }

    #[test]
    fn topic_is_stable_sha256() {
        let t = event_topic("FlowCreated(address,string)");
        assert_eq!(t.len(), 66);
        assert_eq!(t, event_topic("FlowCreated(address,string)"));
        assert_ne!(t, event_topic("FlowCreated(address,bytes)"));
    }
}
