use gf_core::errors::ChainError;
use gf_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de cadena: {0}")]
    Chain(#[from] ChainError),
    #[error("Error de persistencia: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Escenario fallido: {0}")]
    Scenario(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_core::model::Address;

    #[test]
    fn config_variant_format() {
        let err = AppError::Config("GF_ACCOUNT_COUNT".into());
        assert_eq!(err.to_string(), "Error de configuración: GF_ACCOUNT_COUNT");
    }

    #[test]
    fn chain_variant_from() {
        let err: AppError = ChainError::UnknownContract(Address::ZERO).into();
        assert!(err.to_string().starts_with("Error de cadena: no contract deployed at 0x0000"));
    }
}
