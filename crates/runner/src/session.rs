//! Session - Engine lifecycle for one process run
//!
//! Wires the market engine to a broadcast publisher and runs an event tape
//! that logs everything the engine announces:
//! - Builds the engine from an `EngineConfig`
//! - Opens the market, runs until the duration ends or a shutdown future
//!   resolves, then closes it
//! - Reports tape counts, tick stats and the final prices

use market_sim::{
    BroadcastEventPublisher, ConfigError, EngineConfig, InstrumentSnapshot, MarketEngine,
    MarketError, MarketEvent, TickStats,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Market error: {0}")]
    Market(#[from] MarketError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Event tape stopped unexpectedly")]
    TapeLost,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Engine configuration (interval, seeds, walk)
    pub engine: EngineConfig,
    /// How long the market stays open; `None` runs until shutdown
    pub duration: Option<Duration>,
    /// Capacity of the event broadcast channel
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            duration: None,
            event_capacity: 10000,
        }
    }
}

impl SessionConfig {
    /// Apply `TICK_INTERVAL_MS` and `WALK_SEED` overrides
    ///
    /// `lookup` is usually `|name| std::env::var(name).ok()`.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = lookup("TICK_INTERVAL_MS") {
            self.engine.tick_interval_ms = parse_env("TICK_INTERVAL_MS", &value)?;
        }
        if let Some(value) = lookup("WALK_SEED") {
            self.engine.walk.seed = Some(parse_env("WALK_SEED", &value)?);
        }
        self.engine.validate()?;
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| SessionError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}

/// Counts of events seen on the tape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TapeSummary {
    pub opened: u64,
    pub closed: u64,
    pub resets: u64,
    pub price_changes: u64,
    /// Events the tape fell too far behind to see
    pub lagged: u64,
}

impl TapeSummary {
    fn record(&mut self, event: &MarketEvent) {
        let at = event.timestamp();
        match event {
            MarketEvent::MarketOpened { .. } => {
                self.opened += 1;
                log::info!("[tape] market opened at {}", at);
            }
            MarketEvent::MarketClosed { .. } => {
                self.closed += 1;
                log::info!("[tape] market closed at {}", at);
            }
            MarketEvent::MarketReset { .. } => {
                self.resets += 1;
                log::info!("[tape] market reset at {}", at);
            }
            MarketEvent::PriceChanged { stock, .. } => {
                self.price_changes += 1;
                log::debug!(
                    "[tape] {} {} ({:+}) day {}..{}",
                    stock.symbol,
                    stock.price,
                    stock.last_change,
                    stock.day_low,
                    stock.day_high
                );
            }
        }
    }
}

/// Outcome of a finished session
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub tape: TapeSummary,
    pub stats: TickStats,
    pub final_stocks: Vec<InstrumentSnapshot>,
}

/// A running market engine with its publisher and event tape
pub struct MarketSession {
    config: SessionConfig,
    engine: MarketEngine,
    publisher: Arc<BroadcastEventPublisher>,
    tape: JoinHandle<TapeSummary>,
    tape_stop: oneshot::Sender<()>,
}

impl MarketSession {
    /// Build the engine and start the tape; the market starts closed
    ///
    /// Must be called from inside a tokio runtime.
    pub fn start(config: SessionConfig) -> Result<Self> {
        let publisher = Arc::new(BroadcastEventPublisher::new(config.event_capacity));
        let events = publisher.subscribe();
        let engine = MarketEngine::new(config.engine.clone(), publisher.clone())?;

        let (tape_stop, stop_rx) = oneshot::channel();
        let tape = tokio::spawn(run_tape(events, stop_rx));

        log::info!(
            "Session started: {} instruments, walk={}",
            engine.get_all_stocks().len(),
            engine.walk_name()
        );

        Ok(Self {
            config,
            engine,
            publisher,
            tape,
            tape_stop,
        })
    }

    pub fn engine(&self) -> &MarketEngine {
        &self.engine
    }

    pub fn publisher(&self) -> &Arc<BroadcastEventPublisher> {
        &self.publisher
    }

    /// Open the market and keep it open until the configured duration
    /// elapses or `shutdown` resolves, whichever comes first
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<SessionReport> {
        self.engine.open_market();

        let duration = self.config.duration;
        let timer = async move {
            match duration {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            _ = timer => log::info!("Session duration reached"),
            _ = shutdown => log::info!("Shutdown requested"),
        }

        self.engine.close_market();
        self.finish().await
    }

    /// Stop the tape and collect the report
    ///
    /// Does not touch the market state; call `close_market` first if the
    /// market should not keep ticking.
    pub async fn finish(self) -> Result<SessionReport> {
        // Receiver may already be gone if the tape ended on its own
        let _ = self.tape_stop.send(());
        let tape = self.tape.await.map_err(|_| SessionError::TapeLost)?;

        Ok(SessionReport {
            tape,
            stats: self.engine.tick_stats(),
            final_stocks: self.engine.get_all_stocks(),
        })
    }
}

async fn run_tape(
    mut events: broadcast::Receiver<MarketEvent>,
    mut stop: oneshot::Receiver<()>,
) -> TapeSummary {
    let mut summary = TapeSummary::default();

    loop {
        tokio::select! {
            result = events.recv() => match result {
                Ok(event) => summary.record(&event),
                Err(RecvError::Lagged(n)) => {
                    log::warn!("[tape] lagged {} events", n);
                    summary.lagged += n;
                }
                Err(RecvError::Closed) => return summary,
            },
            _ = &mut stop => break,
        }
    }

    // Pick up whatever was published before the stop
    loop {
        match events.try_recv() {
            Ok(event) => summary.record(&event),
            Err(TryRecvError::Lagged(n)) => summary.lagged += n,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }

    summary
}
