//! Error types for the slot machine

use thiserror::Error;

/// Prize exchange failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Prize {0} cannot be exchanged")]
    NotExchangeable(u32),

    #[error("Insufficient coins: need {cost}, have {coins}")]
    InsufficientFunds { cost: u64, coins: u64 },

    #[error("Exchange of prize {0} was declined")]
    Declined(u32),
}

/// Coin purchase failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("Wrong serial key")]
    WrongKey,

    #[error("Invalid purchase amount: {0}")]
    InvalidAmount(u64),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
