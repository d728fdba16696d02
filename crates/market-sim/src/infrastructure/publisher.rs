use dashmap::DashMap;
use std::sync::Arc;
use ticker_core::{InstrumentSnapshot, MarketEvent};
use ticker_ports::{BroadcastSink, SinkResult};
use tokio::sync::broadcast;

/// Broadcast-based event publisher
///
/// Uses tokio broadcast channels to publish market events to any number of
/// subscribers. Supports both global subscriptions and per-symbol
/// subscriptions. A lagging subscriber loses old events instead of slowing
/// the engine down.
pub struct BroadcastEventPublisher {
    /// Global broadcast channel for all events
    global_tx: broadcast::Sender<MarketEvent>,
    /// Per-symbol broadcast channels (price changes only)
    symbol_channels: Arc<DashMap<String, broadcast::Sender<MarketEvent>>>,
    /// Channel capacity
    capacity: usize,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (global_tx, _) = broadcast::channel(capacity);

        BroadcastEventPublisher {
            global_tx,
            symbol_channels: Arc::new(DashMap::new()),
            capacity,
        }
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.global_tx.subscribe()
    }

    /// Subscribe to price changes for a specific symbol
    pub fn subscribe_symbol(&self, symbol: &str) -> broadcast::Receiver<MarketEvent> {
        let entry = self
            .symbol_channels
            .entry(symbol.to_string())
            .or_insert_with(|| {
                let (tx, _) = broadcast::channel(self.capacity);
                tx
            });

        entry.value().subscribe()
    }

    /// Number of live global subscribers
    pub fn subscriber_count(&self) -> usize {
        self.global_tx.receiver_count()
    }

    fn publish(&self, event: MarketEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.global_tx.send(event);
    }

    fn publish_to_symbol(&self, symbol: &str, event: MarketEvent) {
        // Publish to global channel
        let _ = self.global_tx.send(event.clone());

        // Publish to symbol-specific channel if exists
        if let Some(tx) = self.symbol_channels.get(symbol) {
            let _ = tx.send(event);
        }
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl Clone for BroadcastEventPublisher {
    fn clone(&self) -> Self {
        BroadcastEventPublisher {
            global_tx: self.global_tx.clone(),
            symbol_channels: Arc::clone(&self.symbol_channels),
            capacity: self.capacity,
        }
    }
}

impl BroadcastSink for BroadcastEventPublisher {
    fn on_market_opened(&self) -> SinkResult {
        self.publish(MarketEvent::opened());
        Ok(())
    }

    fn on_market_closed(&self) -> SinkResult {
        self.publish(MarketEvent::closed());
        Ok(())
    }

    fn on_market_reset(&self) -> SinkResult {
        self.publish(MarketEvent::reset());
        Ok(())
    }

    fn on_instrument_price_changed(&self, stock: &InstrumentSnapshot) -> SinkResult {
        self.publish_to_symbol(&stock.symbol, MarketEvent::price_changed(stock.clone()));
        Ok(())
    }
}
