use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Market mode gating whether ticks run and whether a reset is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MarketState {
    #[default]
    Closed,
    Open,
}

impl MarketState {
    pub fn is_open(&self) -> bool {
        matches!(self, MarketState::Open)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketState::Closed => "Closed",
            MarketState::Open => "Open",
        }
    }
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown market state: {0}")]
pub struct ParseMarketStateError(pub String);

impl FromStr for MarketState {
    type Err = ParseMarketStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "closed" => Ok(MarketState::Closed),
            "open" => Ok(MarketState::Open),
            _ => Err(ParseMarketStateError(s.to_string())),
        }
    }
}
