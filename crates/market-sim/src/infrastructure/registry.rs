use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use ticker_core::{Instrument, InstrumentSeed, InstrumentSnapshot, Symbol};

use crate::error::{MarketError, Result};

/// Highest accepted seed price
///
/// Leaves the walk plenty of headroom below `Decimal::MAX`.
pub const MAX_SEED_PRICE: Decimal = dec!(1_000_000_000);

/// Shared handle to one instrument
///
/// The mutex makes a whole `set_price` atomic with respect to readers of the
/// same instrument.
pub type InstrumentCell = Arc<Mutex<Instrument>>;

/// In-memory instrument registry keyed by symbol
///
/// The map itself sits behind a read-write lock so that `load` swaps the whole
/// set at once: a concurrent snapshot sees the old set or the new one, never a
/// mix.
pub struct InstrumentRegistry {
    instruments: RwLock<HashMap<Symbol, InstrumentCell>>,
}

impl InstrumentRegistry {
    pub fn new() -> Self {
        InstrumentRegistry {
            instruments: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry populated from `seeds`
    pub fn from_seeds(seeds: &[InstrumentSeed]) -> Result<Self> {
        let registry = Self::new();
        registry.load(seeds)?;
        Ok(registry)
    }

    /// Replace every instrument with fresh ones built from `seeds`
    ///
    /// Rejects empty symbols, prices at or below zero or above
    /// [`MAX_SEED_PRICE`], and duplicates. Nothing changes if any seed is
    /// invalid.
    pub fn load(&self, seeds: &[InstrumentSeed]) -> Result<()> {
        let fresh = Self::build(seeds)?;
        *self.instruments.write() = fresh;
        Ok(())
    }

    fn build(seeds: &[InstrumentSeed]) -> Result<HashMap<Symbol, InstrumentCell>> {
        let mut map = HashMap::with_capacity(seeds.len());

        for seed in seeds {
            if seed.symbol.trim().is_empty() {
                return Err(MarketError::InvalidSeed {
                    symbol: seed.symbol.clone(),
                    reason: "symbol is empty".to_string(),
                });
            }
            if seed.price <= Decimal::ZERO {
                return Err(MarketError::InvalidSeed {
                    symbol: seed.symbol.clone(),
                    reason: format!("price must be positive, got {}", seed.price),
                });
            }
            if seed.price > MAX_SEED_PRICE {
                return Err(MarketError::InvalidSeed {
                    symbol: seed.symbol.clone(),
                    reason: format!("price {} exceeds {}", seed.price, MAX_SEED_PRICE),
                });
            }
            if map.contains_key(&seed.symbol) {
                return Err(MarketError::DuplicateSymbol(seed.symbol.clone()));
            }

            let instrument = seed.instrument()?;
            map.insert(seed.symbol.clone(), Arc::new(Mutex::new(instrument)));
        }

        Ok(map)
    }

    /// Point-in-time copy of every instrument, sorted by symbol
    pub fn snapshot(&self) -> Vec<InstrumentSnapshot> {
        let mut snapshots: Vec<_> = self
            .cells()
            .iter()
            .map(|cell| cell.lock().snapshot())
            .collect();
        snapshots.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        snapshots
    }

    /// Get a single instrument snapshot
    pub fn get(&self, symbol: &str) -> Option<InstrumentSnapshot> {
        self.cell(symbol).map(|cell| cell.lock().snapshot())
    }

    /// Handle to one instrument for in-place mutation
    pub fn cell(&self, symbol: &str) -> Option<InstrumentCell> {
        self.instruments.read().get(symbol).map(Arc::clone)
    }

    /// Handles to every instrument currently registered
    ///
    /// The map lock is released before returning, so callers may hold the
    /// cells while a `load` swaps in a new set.
    pub fn cells(&self) -> Vec<InstrumentCell> {
        self.instruments.read().values().map(Arc::clone).collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.instruments.read().contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.instruments.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.read().is_empty()
    }
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
