use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use ticker_core::Price;
use ticker_ports::PriceWalk;

use crate::{WalkConfig, signed_delta};

/// Walk whose move size and sign are seeded from the truncated price
///
/// The selection gate uses one shared RNG. Once selected, a fresh RNG seeded
/// with `trunc(price)` supplies the magnitude and sign, so two instruments at
/// the same whole price always move by the same amount.
pub struct PriceSeededWalk {
    config: WalkConfig,
    selector: StdRng,
}

impl PriceSeededWalk {
    pub fn new(config: WalkConfig) -> Self {
        let selector = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, selector }
    }
}

impl PriceWalk for PriceSeededWalk {
    fn next_move(&mut self, _symbol: &str, price: Price) -> Option<Decimal> {
        let selection: f64 = self.selector.r#gen();
        if selection > self.config.selection_probability {
            return None;
        }

        let seed = price.trunc().to_u64().unwrap_or(0);
        let mut rng = StdRng::seed_from_u64(seed);
        let magnitude: f64 = rng.r#gen();
        let sign: f64 = rng.r#gen();
        Some(signed_delta(price, magnitude, sign, &self.config))
    }

    fn name(&self) -> &str {
        "PriceSeededWalk"
    }
}
