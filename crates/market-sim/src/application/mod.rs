pub mod engine;

pub use engine::{MarketEngine, TickOutcome, TickStats};
