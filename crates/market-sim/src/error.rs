use thiserror::Error;
use ticker_core::{InstrumentError, MarketState};

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Cannot {operation} while market is {state}")]
    InvalidState {
        operation: &'static str,
        state: MarketState,
    },

    #[error("Invalid seed for {symbol}: {reason}")]
    InvalidSeed { symbol: String, reason: String },

    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Instrument error: {0}")]
    Instrument(#[from] InstrumentError),

    #[error("No tokio runtime available to drive the ticker")]
    NoRuntime,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, MarketError>;
