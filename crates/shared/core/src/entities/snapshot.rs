use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::{Price, Symbol};

/// Point-in-time read model of an instrument
///
/// This is what callers of the engine and broadcast sinks see. It is a copy,
/// so holding one never blocks the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSnapshot {
    pub symbol: Symbol,
    pub price: Price,
    pub day_open: Price,
    pub day_low: Price,
    pub day_high: Price,
    pub last_change: Decimal,
    /// price - day_open
    pub change: Decimal,
    /// change / price rounded to 4 places; `None` at a zero price
    pub percent_change: Option<Decimal>,
}
