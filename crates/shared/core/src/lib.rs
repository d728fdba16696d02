//! Ticker Core Domain
//!
//! Pure domain types for the ticker market simulation.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Instrument, InstrumentError, InstrumentSeed, InstrumentSnapshot, MarketEvent, MarketState,
    ParseMarketStateError, PriceUpdate,
};
pub use values::{Price, Symbol, Timestamp};
