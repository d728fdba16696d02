//! Ticker Price Walks
//!
//! Implementations of the `PriceWalk` port for the ticker market simulation.

mod config;
mod price_seeded;
mod random;

pub use config::{WalkConfig, WalkConfigError, WalkKind};
pub use price_seeded::PriceSeededWalk;
pub use random::RandomWalk;

// Re-export the trait from ports for convenience
pub use ticker_ports::PriceWalk;

use rust_decimal::Decimal;
use ticker_core::Price;

/// Factory function to create a price walk from its configuration
pub fn create_price_walk(config: &WalkConfig) -> Box<dyn PriceWalk> {
    match config.kind {
        WalkKind::PriceSeeded => Box::new(PriceSeededWalk::new(config.clone())),
        WalkKind::Random => Box::new(RandomWalk::new(config.clone())),
    }
}

/// Turn a pair of uniform draws into a signed, cent-rounded move
///
/// `magnitude_draw` is scaled by `max_move_percent`; the move is downward
/// when `sign_draw <= down_probability`.
pub(crate) fn signed_delta(
    price: Price,
    magnitude_draw: f64,
    sign_draw: f64,
    config: &WalkConfig,
) -> Decimal {
    let fraction = Decimal::from_f64_retain(magnitude_draw * config.max_move_percent)
        .map(|f| f.round_dp(10))
        .unwrap_or(Decimal::ZERO);
    let delta = (price * fraction).round_dp(2);

    if sign_draw <= config.down_probability {
        -delta
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_delta_rounds_to_cents() {
        let config = WalkConfig::default();
        // 100 * (0.5 * 0.002) = 0.1
        assert_eq!(signed_delta(dec!(100), 0.5, 0.9, &config), dec!(0.10));
        assert_eq!(signed_delta(dec!(100), 0.5, 0.2, &config), dec!(-0.10));
        // 80 * (0.01 * 0.002) = 0.0016 -> rounds to 0.00
        assert_eq!(signed_delta(dec!(80), 0.01, 0.9, &config), dec!(0));
    }

    #[test]
    fn test_factory_picks_kind() {
        let random = create_price_walk(&WalkConfig::default());
        assert_eq!(random.name(), "RandomWalk");

        let config = WalkConfig {
            kind: WalkKind::PriceSeeded,
            ..Default::default()
        };
        let seeded = create_price_walk(&config);
        assert_eq!(seeded.name(), "PriceSeededWalk");
    }
}
