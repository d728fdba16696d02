use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use ticker_core::Price;
use ticker_ports::PriceWalk;

use crate::{WalkConfig, signed_delta};

/// Sparse random walk
///
/// Each call draws a selection value; only draws at or below
/// `selection_probability` move. A selected instrument then gets a magnitude
/// draw (scaled by `max_move_percent`) and a sign draw (biased by
/// `down_probability`).
pub struct RandomWalk {
    config: WalkConfig,
    rng: StdRng,
}

impl RandomWalk {
    /// Create a walk, seeded from `config.seed` when present
    pub fn new(config: WalkConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Create with a specific seed for reproducible simulations
    pub fn with_seed(config: WalkConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PriceWalk for RandomWalk {
    fn next_move(&mut self, _symbol: &str, price: Price) -> Option<Decimal> {
        let selection: f64 = self.rng.r#gen();
        if selection > self.config.selection_probability {
            return None;
        }

        let magnitude: f64 = self.rng.r#gen();
        let sign: f64 = self.rng.r#gen();
        Some(signed_delta(price, magnitude, sign, &self.config))
    }

    fn name(&self) -> &str {
        "RandomWalk"
    }
}
