use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use ticker_core::{InstrumentSnapshot, MarketState, Price, PriceUpdate};
use ticker_ports::{BroadcastSink, PriceWalk, SinkResult};
use ticker_walk::create_price_walk;
use tokio::runtime::Handle;

use crate::config::EngineConfig;
use crate::error::{MarketError, Result};
use crate::infrastructure::{InstrumentRegistry, StopSignal, Ticker};

/// Result of one tick pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The pass ran; `moved` instruments changed price
    Completed { moved: usize },
    /// Another pass was still running, this one was skipped
    Dropped,
    /// Market not open, or the ticker that scheduled the pass was stopped
    Idle,
}

/// Tick counters since the engine was built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub timer_fires: u64,
    pub passes: u64,
    pub dropped: u64,
    pub idle: u64,
    pub tickers_started: u64,
}

#[derive(Default)]
struct TickCounters {
    timer_fires: AtomicU64,
    passes: AtomicU64,
    dropped: AtomicU64,
    idle: AtomicU64,
    tickers_started: AtomicU64,
}

impl TickCounters {
    fn snapshot(&self) -> TickStats {
        TickStats {
            timer_fires: self.timer_fires.load(Ordering::SeqCst),
            passes: self.passes.load(Ordering::SeqCst),
            dropped: self.dropped.load(Ordering::SeqCst),
            idle: self.idle.load(Ordering::SeqCst),
            tickers_started: self.tickers_started.load(Ordering::SeqCst),
        }
    }
}

/// Held for the length of one tick pass; clears the flag on drop
struct TickGuard<'a>(&'a AtomicBool);

impl<'a> TickGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TickGuard(flag))
    }
}

impl<'a> TickGuard<'a> {
    /// Wait until any running pass finishes, then hold the flag
    fn acquire(flag: &'a AtomicBool) -> Self {
        loop {
            if let Some(guard) = Self::try_acquire(flag) {
                return guard;
            }
            std::thread::yield_now();
        }
    }
}

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Everything guarded by the market-state lock
struct MarketCore {
    state: MarketState,
    ticker: Option<Ticker>,
}

struct EngineInner {
    config: EngineConfig,
    registry: InstrumentRegistry,
    walk: Mutex<Box<dyn PriceWalk>>,
    sink: Arc<dyn BroadcastSink>,
    market: Mutex<MarketCore>,
    /// Mirrors `market.state` for tick passes, written under the market lock
    accepting_ticks: AtomicBool,
    tick_in_progress: AtomicBool,
    counters: TickCounters,
    runtime: Handle,
}

/// Market simulation engine
///
/// Owns the instrument registry, the recurring ticker and the Closed/Open
/// state machine. The handle is cheap to clone; build one at startup and pass
/// it to whatever layer exposes the market to callers.
///
/// Open, close and reset are serialized by one lock and are idempotent. Tick
/// passes are single-flight: a pass that finds another one running is dropped.
#[derive(Clone)]
pub struct MarketEngine {
    inner: Arc<EngineInner>,
}

impl MarketEngine {
    /// Create an engine driven by the current tokio runtime
    ///
    /// The walk is built from `config.walk`.
    pub fn new(config: EngineConfig, sink: Arc<dyn BroadcastSink>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| MarketError::NoRuntime)?;
        config.validate()?;
        let walk = create_price_walk(&config.walk);
        Self::with_walk(config, walk, sink, runtime)
    }

    /// Create an engine with an explicit walk and runtime handle
    pub fn with_walk(
        config: EngineConfig,
        walk: Box<dyn PriceWalk>,
        sink: Arc<dyn BroadcastSink>,
        runtime: Handle,
    ) -> Result<Self> {
        config.validate()?;
        let registry = InstrumentRegistry::from_seeds(&config.seeds)?;

        info!(
            "Market engine ready: {} instruments, tick every {}ms, walk={}",
            registry.len(),
            config.tick_interval_ms,
            walk.name()
        );

        Ok(Self {
            inner: Arc::new(EngineInner {
                config,
                registry,
                walk: Mutex::new(walk),
                sink,
                market: Mutex::new(MarketCore {
                    state: MarketState::Closed,
                    ticker: None,
                }),
                accepting_ticks: AtomicBool::new(false),
                tick_in_progress: AtomicBool::new(false),
                counters: TickCounters::default(),
                runtime,
            }),
        })
    }

    // ============ State Machine ============

    /// Start the ticker and move to Open; no-op when already open
    pub fn open_market(&self) {
        let mut market = self.inner.market.lock();
        if market.state.is_open() {
            debug!("open_market ignored: market already open");
            return;
        }

        market.state = MarketState::Open;
        self.inner.accepting_ticks.store(true, Ordering::SeqCst);
        market.ticker = Some(self.start_ticker());
        self.inner
            .counters
            .tickers_started
            .fetch_add(1, Ordering::SeqCst);

        info!("Market opened");
        self.inner.notify("market opened", |sink| sink.on_market_opened());
    }

    /// Stop the ticker and move to Closed; no-op when already closed
    ///
    /// No tick pass starts after this returns. A pass already running is
    /// allowed to finish.
    pub fn close_market(&self) {
        let mut market = self.inner.market.lock();
        if !market.state.is_open() {
            debug!("close_market ignored: market already closed");
            return;
        }

        if let Some(ticker) = market.ticker.take() {
            ticker.stop();
        }
        market.state = MarketState::Closed;
        self.inner.accepting_ticks.store(false, Ordering::SeqCst);

        info!("Market closed");
        self.inner.notify("market closed", |sink| sink.on_market_closed());
    }

    /// Reload every instrument to its seed price
    ///
    /// Only allowed while the market is closed. A pass still running from
    /// before the close is waited out, so its price changes are broadcast
    /// before the reset.
    pub fn reset(&self) -> Result<()> {
        let market = self.inner.market.lock();
        if market.state != MarketState::Closed {
            warn!("reset rejected: market is {}", market.state);
            return Err(MarketError::InvalidState {
                operation: "reset",
                state: market.state,
            });
        }

        let _guard = TickGuard::acquire(&self.inner.tick_in_progress);
        self.inner.registry.load(&self.inner.config.seeds)?;

        info!(
            "Market reset: {} instruments reloaded",
            self.inner.registry.len()
        );
        self.inner.notify("market reset", |sink| sink.on_market_reset());
        Ok(())
    }

    fn start_ticker(&self) -> Ticker {
        let engine: Weak<EngineInner> = Arc::downgrade(&self.inner);

        Ticker::start(
            &self.inner.runtime,
            self.inner.config.tick_interval(),
            move |stop| {
                if let Some(inner) = engine.upgrade() {
                    inner.on_timer_fire(stop);
                }
            },
        )
    }

    // ============ Ticks ============

    /// Run one price-walk pass across the registry by hand
    ///
    /// Same rules as a timer-driven pass: nothing happens unless the market is
    /// open, and an overlapping pass is dropped.
    pub fn tick(&self) -> TickOutcome {
        self.inner.run_pass(None)
    }

    pub fn tick_stats(&self) -> TickStats {
        self.inner.counters.snapshot()
    }

    // ============ Queries & Mutation ============

    /// Point-in-time copy of all instruments
    pub fn get_all_stocks(&self) -> Vec<InstrumentSnapshot> {
        self.inner.registry.snapshot()
    }

    pub fn get_stock(&self, symbol: &str) -> Option<InstrumentSnapshot> {
        self.inner.registry.get(symbol)
    }

    pub fn get_market_state(&self) -> MarketState {
        self.inner.market.lock().state
    }

    /// Set one instrument's price through the engine
    ///
    /// Broadcasts the new snapshot when the price actually changed.
    pub fn set_price(&self, symbol: &str, price: Price) -> Result<PriceUpdate> {
        let cell = self
            .inner
            .registry
            .cell(symbol)
            .ok_or_else(|| MarketError::SymbolNotFound(symbol.to_string()))?;

        let (update, snapshot) = {
            let mut instrument = cell.lock();
            let update = instrument.set_price(price)?;
            (update, instrument.snapshot())
        };

        if update.is_changed() {
            debug!("{} set to {}", symbol, price);
            self.inner.notify("price change", |sink| {
                sink.on_instrument_price_changed(&snapshot)
            });
        }
        Ok(update)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn walk_name(&self) -> String {
        self.inner.walk.lock().name().to_string()
    }
}

impl EngineInner {
    fn on_timer_fire(&self, stop: &StopSignal) {
        self.counters.timer_fires.fetch_add(1, Ordering::SeqCst);
        self.run_pass(Some(stop));
    }

    fn run_pass(&self, stop: Option<&StopSignal>) -> TickOutcome {
        let Some(_guard) = TickGuard::try_acquire(&self.tick_in_progress) else {
            self.counters.dropped.fetch_add(1, Ordering::SeqCst);
            debug!("Tick dropped: previous pass still running");
            return TickOutcome::Dropped;
        };

        let stopped = stop.is_some_and(StopSignal::is_stopped);
        if stopped || !self.accepting_ticks.load(Ordering::SeqCst) {
            self.counters.idle.fetch_add(1, Ordering::SeqCst);
            return TickOutcome::Idle;
        }

        let mut walk = self.walk.lock();
        let mut moved = 0;

        for cell in self.registry.cells() {
            let changed = {
                let mut instrument = cell.lock();
                let price = instrument.price();
                let Some(delta) = walk.next_move(instrument.symbol(), price) else {
                    continue;
                };

                let Some(target) = price.checked_add(delta) else {
                    warn!(
                        "Walk move rejected: {} {:+} overflows",
                        instrument.symbol(),
                        delta
                    );
                    continue;
                };

                match instrument.set_price(target) {
                    Ok(update) if update.is_changed() => Some(instrument.snapshot()),
                    Ok(_) => None,
                    Err(e) => {
                        warn!("Walk move rejected: {}", e);
                        None
                    }
                }
            };

            if let Some(snapshot) = changed {
                moved += 1;
                debug!(
                    "{} {} ({:+})",
                    snapshot.symbol, snapshot.price, snapshot.last_change
                );
                self.notify("price change", |sink| {
                    sink.on_instrument_price_changed(&snapshot)
                });
            }
        }

        self.counters.passes.fetch_add(1, Ordering::SeqCst);
        TickOutcome::Completed { moved }
    }

    /// Call the sink and swallow any failure
    fn notify(&self, what: &str, send: impl FnOnce(&dyn BroadcastSink) -> SinkResult) {
        if let Err(e) = send(self.sink.as_ref()) {
            warn!("Broadcast of {} failed: {}", what, e);
        }
    }
}
