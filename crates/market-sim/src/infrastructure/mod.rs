pub mod publisher;
pub mod registry;
pub mod ticker;

pub use publisher::BroadcastEventPublisher;
pub use registry::{InstrumentRegistry, MAX_SEED_PRICE};
pub use ticker::{StopSignal, Ticker};
