use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::InstrumentSnapshot;
use crate::values::Timestamp;

/// Notification emitted by the market engine
///
/// Tagged with `type` so a transport can forward the JSON as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MarketEvent {
    MarketOpened {
        timestamp: Timestamp,
    },
    MarketClosed {
        timestamp: Timestamp,
    },
    MarketReset {
        timestamp: Timestamp,
    },
    PriceChanged {
        stock: InstrumentSnapshot,
        timestamp: Timestamp,
    },
}

impl MarketEvent {
    pub fn opened() -> Self {
        MarketEvent::MarketOpened {
            timestamp: Utc::now(),
        }
    }

    pub fn closed() -> Self {
        MarketEvent::MarketClosed {
            timestamp: Utc::now(),
        }
    }

    pub fn reset() -> Self {
        MarketEvent::MarketReset {
            timestamp: Utc::now(),
        }
    }

    pub fn price_changed(stock: InstrumentSnapshot) -> Self {
        MarketEvent::PriceChanged {
            stock,
            timestamp: Utc::now(),
        }
    }

    /// Symbol the event is about, if any
    pub fn symbol(&self) -> Option<&str> {
        match self {
            MarketEvent::PriceChanged { stock, .. } => Some(&stock.symbol),
            _ => None,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            MarketEvent::MarketOpened { timestamp }
            | MarketEvent::MarketClosed { timestamp }
            | MarketEvent::MarketReset { timestamp }
            | MarketEvent::PriceChanged { timestamp, .. } => *timestamp,
        }
    }
}
