//! Market Simulator
//!
//! A concurrently-accessed market simulation engine. It owns a set of
//! instruments, walks their prices on a fixed timer while the market is open,
//! and announces every change through a `BroadcastSink`.
//!
//! # Architecture
//!
//! - **Application**: `MarketEngine` - Closed/Open state machine, tick pass
//! - **Infrastructure**: `InstrumentRegistry`, `Ticker`, `BroadcastEventPublisher`
//! - **Config**: `EngineConfig` loaded from JSON or built in code
//!
//! # Example
//!
//! ```ignore
//! use market_sim::{BroadcastEventPublisher, EngineConfig, MarketEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let publisher = Arc::new(BroadcastEventPublisher::default());
//!     let mut events = publisher.subscribe();
//!     let engine = MarketEngine::new(EngineConfig::default(), publisher.clone()).unwrap();
//!
//!     engine.open_market();
//!     while let Ok(event) = events.recv().await {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

// Application layer
pub mod application;

// Infrastructure layer
pub mod infrastructure;

// Cross-cutting concerns
pub mod config;
pub mod error;

// Re-export main types for convenience
pub use application::{MarketEngine, TickOutcome, TickStats};
pub use config::{ConfigError, EngineConfig};
pub use error::{MarketError, Result};
pub use infrastructure::{
    BroadcastEventPublisher, InstrumentRegistry, MAX_SEED_PRICE, StopSignal, Ticker,
};

pub use ticker_core::{
    Instrument, InstrumentSeed, InstrumentSnapshot, MarketEvent, MarketState, Price, PriceUpdate,
};
pub use ticker_ports::{BroadcastSink, PriceWalk, SinkError, SinkResult};
pub use ticker_walk::{WalkConfig, WalkKind};
