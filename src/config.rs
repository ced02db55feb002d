//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`).
//!
//! Variables:
//! - `GF_ACCOUNT_COUNT` (default 10) y `GF_ACCOUNT_SEED` (default
//!   `gf-devchain`): cuentas de la cadena de desarrollo.
//! - `DATABASE_URL`, `DATABASE_MIN_CONNECTIONS`, `DATABASE_MAX_CONNECTIONS`:
//!   backend Postgres opcional.
use std::env;

use gf_core::chain::ChainConfig;
use gf_core::errors::ChainError;
use log::warn;
use once_cell::sync::Lazy;

use crate::errors::AppError;

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub chain: ChainConfig,
    /// Sólo presente si hay `DATABASE_URL`.
    pub database: Option<DatabaseConfig>,
}

/// Parámetros de conexión a la base de datos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// URL completa de conexión (postgres://...).
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
}

impl AppConfig {
    /// Construye la configuración a partir de un lookup de variables. Valores
    /// numéricos mal formados son error.
    pub fn from_lookup<F>(get: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let chain = ChainConfig::from_lookup(&get).map_err(|e| match e {
                                                       ChainError::InvalidConfig(m) => AppError::Config(m),
                                                       other => AppError::Chain(other),
                                                   })?;
        let database = match get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig { url,
                                               min_connections: parse_or(&get, "DATABASE_MIN_CONNECTIONS", 2)?,
                                               max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 16)? }),
            None => None,
        };
        Ok(Self { chain, database })
    }

    /// Carga `.env` (si existe) y lee el entorno del proceso.
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn chain_config(&self) -> ChainConfig {
        self.chain.clone()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { chain: ChainConfig::default(), database: None }
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> Result<T, AppError>
    where F: Fn(&str) -> Option<String>,
          T: std::str::FromStr
{
    match get(key) {
        Some(raw) => raw.trim()
                        .parse()
                        .map_err(|_| AppError::Config(format!("{key}: valor inválido '{raw}'"))),
        None => Ok(default),
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez. Si el
/// entorno es inválido se usan los defaults (con `warn!`).
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    AppConfig::from_env().unwrap_or_else(|e| {
                             warn!("config inválida, usando defaults: {e}");
                             AppConfig::default()
                         })
});

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.chain.account_count, 10);
        assert_eq!(cfg.chain.account_seed, "gf-devchain");
        assert!(cfg.database.is_none());
        assert_eq!(cfg.chain_config(), ChainConfig::default());
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn database_section_only_with_url() {
        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x/y"),
                                                  ("DATABASE_MAX_CONNECTIONS", "4")])).unwrap();
        let db = cfg.database.expect("database");
        assert_eq!(db.url, "postgres://x/y");
        assert_eq!((db.min_connections, db.max_connections), (2, 4));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(AppConfig::from_lookup(lookup(&[("GF_ACCOUNT_COUNT", "many")])), Err(AppError::Config(_))));
        assert!(matches!(AppConfig::from_lookup(lookup(&[("GF_ACCOUNT_COUNT", "1")])), Err(AppError::Config(_))));
        assert!(matches!(AppConfig::from_lookup(lookup(&[("GF_ACCOUNT_COUNT", "0")])), Err(AppError::Config(_))));
        assert!(matches!(AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x/y"),
                                                          ("DATABASE_MAX_CONNECTIONS", "muchas")])),
                         Err(AppError::Config(_))));
    }
}
