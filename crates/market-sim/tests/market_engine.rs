//! Market Engine Integration Tests
//!
//! Drives the engine through its public API with the broadcast publisher as
//! the sink, using hand-driven ticks so every assertion is deterministic.

use market_sim::{
    BroadcastEventPublisher, EngineConfig, InstrumentSeed, MarketEngine, MarketError, MarketEvent,
    MarketState, Price, PriceUpdate, PriceWalk, TickOutcome,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;

/// Walk that replays a fixed list of moves, then stops moving
struct ScriptedWalk {
    moves: Vec<Option<Decimal>>,
}

impl PriceWalk for ScriptedWalk {
    fn next_move(&mut self, _symbol: &str, _price: Price) -> Option<Decimal> {
        if self.moves.is_empty() {
            None
        } else {
            self.moves.remove(0)
        }
    }

    fn name(&self) -> &str {
        "ScriptedWalk"
    }
}

fn quiet_config() -> EngineConfig {
    // Long interval so the timer never fires during a test
    EngineConfig {
        tick_interval_ms: 3_600_000,
        ..Default::default()
    }
}

fn build(
    config: EngineConfig,
    moves: Vec<Option<Decimal>>,
) -> (MarketEngine, Receiver<MarketEvent>) {
    let publisher = Arc::new(BroadcastEventPublisher::new(1024));
    let events = publisher.subscribe();
    let engine = MarketEngine::with_walk(
        config,
        Box::new(ScriptedWalk { moves }),
        publisher,
        Handle::current(),
    )
    .unwrap();
    (engine, events)
}

fn drain(events: &mut Receiver<MarketEvent>) -> Vec<MarketEvent> {
    let mut out = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => out.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return out,
            Err(TryRecvError::Lagged(_)) => continue,
        }
    }
}

fn default_snapshots() -> Vec<market_sim::InstrumentSnapshot> {
    InstrumentSeed::defaults()
        .iter()
        .map(|seed| seed.instrument().unwrap().snapshot())
        .collect()
}

#[tokio::test]
async fn test_double_open_broadcasts_once() {
    let (engine, mut events) = build(quiet_config(), vec![]);

    engine.open_market();
    engine.open_market();

    let received = drain(&mut events);
    assert_eq!(received.len(), 1);
    assert!(matches!(received[0], MarketEvent::MarketOpened { .. }));
    assert_eq!(engine.tick_stats().tickers_started, 1);
}

#[tokio::test]
async fn test_reopen_starts_a_new_ticker() {
    let (engine, mut events) = build(quiet_config(), vec![]);

    engine.open_market();
    engine.close_market();
    engine.open_market();

    let kinds: Vec<_> = drain(&mut events)
        .into_iter()
        .map(|e| match e {
            MarketEvent::MarketOpened { .. } => "opened",
            MarketEvent::MarketClosed { .. } => "closed",
            MarketEvent::MarketReset { .. } => "reset",
            MarketEvent::PriceChanged { .. } => "price",
        })
        .collect();
    assert_eq!(kinds, vec!["opened", "closed", "opened"]);
    assert_eq!(engine.tick_stats().tickers_started, 2);
}

#[tokio::test]
async fn test_reset_while_open_leaves_registry_alone() {
    let (engine, mut events) = build(quiet_config(), vec![Some(dec!(2.00))]);

    engine.open_market();
    engine.tick();
    let before = engine.get_all_stocks();

    let err = engine.reset().unwrap_err();
    assert!(matches!(err, MarketError::InvalidState { .. }));
    assert_eq!(err.to_string(), "Cannot reset while market is Open");
    assert_eq!(engine.get_all_stocks(), before);
    assert!(
        drain(&mut events)
            .iter()
            .all(|e| !matches!(e, MarketEvent::MarketReset { .. }))
    );
}

#[tokio::test]
async fn test_open_close_reset_restores_defaults() {
    let moves = vec![Some(dec!(1.25)), Some(dec!(-0.40)), None, Some(dec!(0.10))];
    let (engine, mut events) = build(quiet_config(), moves);

    engine.open_market();
    assert_eq!(engine.tick(), TickOutcome::Completed { moved: 3 });
    assert_ne!(engine.get_all_stocks(), default_snapshots());

    engine.close_market();
    engine.reset().unwrap();

    assert_eq!(engine.get_market_state(), MarketState::Closed);
    let stocks = engine.get_all_stocks();
    assert_eq!(stocks, default_snapshots());

    let prices: Vec<_> = stocks.iter().map(|s| (s.symbol.as_str(), s.price)).collect();
    assert_eq!(
        prices,
        vec![
            ("A", dec!(100.00)),
            ("B", dec!(120.00)),
            ("C", dec!(150.00)),
            ("D", dec!(80.00)),
        ]
    );
    for stock in &stocks {
        assert_eq!(stock.day_open, stock.price);
        assert_eq!(stock.day_low, stock.price);
        assert_eq!(stock.day_high, stock.price);
        assert_eq!(stock.change, Decimal::ZERO);
    }

    let last = drain(&mut events).pop().unwrap();
    assert!(matches!(last, MarketEvent::MarketReset { .. }));
}

#[tokio::test]
async fn test_reset_uses_configured_seeds() {
    let config = quiet_config().with_seeds(vec![
        InstrumentSeed::new("XYZ", dec!(42.00)),
        InstrumentSeed::new("QQQ", dec!(7.50)),
    ]);
    let (engine, _events) = build(config, vec![]);

    engine.set_price("XYZ", dec!(43.00)).unwrap();
    engine.reset().unwrap();

    let stocks = engine.get_all_stocks();
    assert_eq!(stocks.len(), 2);
    assert_eq!(engine.get_stock("XYZ").unwrap().price, dec!(42.00));
    assert!(engine.get_stock("A").is_none());
}

#[tokio::test]
async fn test_reset_while_closed_is_repeatable() {
    let (engine, mut events) = build(quiet_config(), vec![]);

    engine.reset().unwrap();
    engine.reset().unwrap();

    let resets = drain(&mut events)
        .into_iter()
        .filter(|e| matches!(e, MarketEvent::MarketReset { .. }))
        .count();
    assert_eq!(resets, 2);
    assert_eq!(engine.get_all_stocks(), default_snapshots());
}

#[tokio::test]
async fn test_same_price_produces_no_event() {
    let (engine, mut events) = build(quiet_config(), vec![]);
    engine.set_price("C", dec!(151.00)).unwrap();
    drain(&mut events);
    let before = engine.get_stock("C").unwrap();

    let update = engine.set_price("C", dec!(151.00)).unwrap();

    assert_eq!(update, PriceUpdate::Unchanged);
    assert_eq!(engine.get_stock("C").unwrap(), before);
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_change_and_percent_change_after_move() {
    let (engine, mut events) = build(quiet_config(), vec![Some(dec!(1.00))]);

    engine.open_market();
    drain(&mut events);
    assert_eq!(engine.tick(), TickOutcome::Completed { moved: 1 });

    let changed = drain(&mut events);
    assert_eq!(changed.len(), 1);
    let MarketEvent::PriceChanged { stock, .. } = &changed[0] else {
        panic!("expected a price change, got {:?}", changed[0]);
    };

    // Registry iteration order is unspecified, so check whichever moved
    let seed = InstrumentSeed::defaults()
        .into_iter()
        .find(|s| s.symbol == stock.symbol)
        .unwrap();
    assert_eq!(stock.price, seed.price + dec!(1.00));
    assert_eq!(stock.change, dec!(1.00));
    assert_eq!(
        stock.percent_change,
        Some((dec!(1.00) / stock.price).round_dp(4))
    );
    assert_eq!(engine.get_stock(&stock.symbol).as_ref(), Some(stock));
}

#[tokio::test]
async fn test_day_stats_hold_across_ticks() {
    let moves: Vec<_> = [
        dec!(0.20),
        dec!(-0.35),
        dec!(0.05),
        dec!(-0.10),
        dec!(0.30),
        dec!(-0.25),
    ]
    .into_iter()
    .cycle()
    .take(400)
    .map(Some)
    .collect();
    let (engine, _events) = build(quiet_config(), moves);
    let seeds = InstrumentSeed::defaults();

    engine.open_market();
    for _ in 0..100 {
        engine.tick();
        for stock in engine.get_all_stocks() {
            assert!(stock.day_low <= stock.price);
            assert!(stock.price <= stock.day_high);
            let seed = seeds.iter().find(|s| s.symbol == stock.symbol).unwrap();
            assert_eq!(stock.day_open, seed.price);
        }
    }
}

#[tokio::test]
async fn test_state_display_for_callers() {
    let (engine, _events) = build(quiet_config(), vec![]);
    assert_eq!(engine.get_market_state().to_string(), "Closed");
    engine.open_market();
    assert_eq!(engine.get_market_state().to_string(), "Open");
}
