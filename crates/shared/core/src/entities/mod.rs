mod event;
mod instrument;
mod market_state;
mod seed;
mod snapshot;

pub use event::MarketEvent;
pub use instrument::{Instrument, InstrumentError, PriceUpdate};
pub use market_state::{MarketState, ParseMarketStateError};
pub use seed::InstrumentSeed;
pub use snapshot::InstrumentSnapshot;
