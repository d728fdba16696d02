use ticker_core::InstrumentSnapshot;

use crate::error::SinkResult;

/// Port for one-way market notifications
///
/// Implemented by the transport layer (WebSocket hub, message bus, channel
/// fan-out, ...). The engine calls these fire-and-forget: a returned error
/// is logged and dropped.
///
/// Calls happen inline on the tick path, and the market notifications are
/// made while the engine holds its state lock. Implementations must not
/// block and must not call back into the engine from inside a notification.
/// Hand slow delivery off to a queue or channel instead.
pub trait BroadcastSink: Send + Sync {
    /// The market moved from Closed to Open
    fn on_market_opened(&self) -> SinkResult;

    /// The market moved from Open to Closed
    fn on_market_closed(&self) -> SinkResult;

    /// Instruments were reloaded to their seed prices
    fn on_market_reset(&self) -> SinkResult;

    /// A tick changed an instrument's price
    fn on_instrument_price_changed(&self, stock: &InstrumentSnapshot) -> SinkResult;
}
