//! Ticker Runner - Process glue for the market simulator
//!
//! - **Session**: builds the engine, wires the broadcast publisher, runs an
//!   event tape and reports on shutdown
//! - **Binary**: `ticker`, a command-line host for a session
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────┐   fires    ┌──────────────────┐
//!   │    Ticker    │──────────▶ │   MarketEngine   │
//!   └──────────────┘            └────────┬─────────┘
//!                                        │ BroadcastSink
//!                                        ▼
//!                            ┌─────────────────────────┐
//!                            │ BroadcastEventPublisher │
//!                            └────────────┬────────────┘
//!                                         │ MarketEvent
//!                                         ▼
//!                                 ┌───────────────┐
//!                                 │  Event tape   │
//!                                 └───────────────┘
//! ```

pub mod session;

pub use session::{
    MarketSession, Result, SessionConfig, SessionError, SessionReport, TapeSummary,
};
