use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{Instrument, InstrumentError};
use crate::values::{Price, Symbol};

/// Starting symbol and price for one instrument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSeed {
    pub symbol: Symbol,
    pub price: Price,
}

impl InstrumentSeed {
    pub fn new(symbol: impl Into<Symbol>, price: Price) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }

    /// The built-in instrument set: A, B, C and D
    pub fn defaults() -> Vec<InstrumentSeed> {
        vec![
            InstrumentSeed::new("A", dec!(100.00)),
            InstrumentSeed::new("B", dec!(120.00)),
            InstrumentSeed::new("C", dec!(150.00)),
            InstrumentSeed::new("D", dec!(80.00)),
        ]
    }

    /// Build a fresh instrument priced at this seed
    pub fn instrument(&self) -> Result<Instrument, InstrumentError> {
        Instrument::seeded(self.symbol.clone(), self.price)
    }
}
