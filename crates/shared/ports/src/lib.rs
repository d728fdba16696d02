//! Ticker Ports
//!
//! Port definitions (traits) for the ticker market simulation.
//! These define the boundaries between the engine and its collaborators.

mod broadcast;
mod error;
mod walk;

pub use broadcast::BroadcastSink;
pub use error::{SinkError, SinkResult};
pub use walk::PriceWalk;
