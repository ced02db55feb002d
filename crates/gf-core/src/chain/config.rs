use crate::constants::{DEFAULT_ACCOUNT_COUNT, DEFAULT_ACCOUNT_SEED};
use crate::errors::ChainError;

/// Mínimo de cuentas: el owner y al menos otra cuenta.
pub const MIN_ACCOUNT_COUNT: usize = 2;

/// Parámetros de la cadena de desarrollo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Cantidad de cuentas desbloqueadas (`accounts[0..n]`).
    pub account_count: usize,
    /// Semilla de derivación de las cuentas.
    pub account_seed: String,
}

impl ChainConfig {
    pub fn new(account_count: usize, account_seed: impl Into<String>) -> Self {
        Self { account_count, account_seed: account_seed.into() }
    }

    /// Lee `GF_ACCOUNT_COUNT` y `GF_ACCOUNT_SEED` desde `get`. Variables
    /// ausentes caen al default; un conteo mal formado o menor a
    /// `MIN_ACCOUNT_COUNT` es `ChainError::InvalidConfig`.
    pub fn from_lookup<F>(get: F) -> Result<Self, ChainError>
        where F: Fn(&str) -> Option<String>
    {
        let account_count = match get("GF_ACCOUNT_COUNT") {
            Some(raw) => raw.trim()
                            .parse::<usize>()
                            .map_err(|_| ChainError::InvalidConfig(format!("GF_ACCOUNT_COUNT: valor inválido '{raw}'")))?,
            None => DEFAULT_ACCOUNT_COUNT,
        };
        if account_count < MIN_ACCOUNT_COUNT {
            return Err(ChainError::InvalidConfig(format!("GF_ACCOUNT_COUNT debe ser >= {MIN_ACCOUNT_COUNT}, es {account_count}")));
        }
        let account_seed = get("GF_ACCOUNT_SEED").unwrap_or_else(|| DEFAULT_ACCOUNT_SEED.to_string());
        Ok(Self { account_count, account_seed })
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT_COUNT, DEFAULT_ACCOUNT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |k| pairs.iter().find(|(key, _)| *key == k).map(|(_, v)| v.to_string())
    }

    #[test]
    fn defaults_without_env() {
        assert_eq!(ChainConfig::from_lookup(lookup(&[])).unwrap(), ChainConfig::default());
    }

    #[test]
    fn reads_count_and_seed() {
        let cfg = ChainConfig::from_lookup(lookup(&[("GF_ACCOUNT_COUNT", " 3 "), ("GF_ACCOUNT_SEED", "s")])).unwrap();
        assert_eq!(cfg, ChainConfig::new(3, "s"));
    }

    #[test]
    fn rejects_malformed_and_too_small_counts() {
        const CASES: [&[(&str, &str)]; 5] = [&[("GF_ACCOUNT_COUNT", "many")],
                                             &[("GF_ACCOUNT_COUNT", "-1")],
                                             &[("GF_ACCOUNT_COUNT", "")],
                                             &[("GF_ACCOUNT_COUNT", "0")],
                                             &[("GF_ACCOUNT_COUNT", "1")]];
        for pairs in CASES {
            let err = ChainConfig::from_lookup(lookup(pairs)).unwrap_err();
            assert!(matches!(err, ChainError::InvalidConfig(_)), "{pairs:?}: {err:?}");
        }
    }
}
