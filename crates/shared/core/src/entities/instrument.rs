use rust_decimal::Decimal;
use thiserror::Error;

use super::InstrumentSnapshot;
use crate::values::{Price, Symbol};

/// Errors raised by instrument mutation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstrumentError {
    #[error("Negative price {price} for {symbol}")]
    NegativePrice { symbol: Symbol, price: Price },
}

/// Result of a `set_price` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceUpdate {
    /// New price equals the current one, nothing was touched
    Unchanged,
    /// Price moved from `previous` to `current`
    Changed { previous: Price, current: Price },
}

impl PriceUpdate {
    pub fn is_changed(&self) -> bool {
        matches!(self, PriceUpdate::Changed { .. })
    }
}

/// A simulated tradable item with its current price and daily statistics
///
/// Day statistics start at zero, which stands for "unset", and are filled
/// from the first accepted price. All mutation goes through [`Instrument::set_price`].
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    symbol: Symbol,
    price: Price,
    day_open: Price,
    day_low: Price,
    day_high: Price,
    last_change: Decimal,
}

impl Instrument {
    /// Create an instrument with every price field unset
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            price: Decimal::ZERO,
            day_open: Decimal::ZERO,
            day_low: Decimal::ZERO,
            day_high: Decimal::ZERO,
            last_change: Decimal::ZERO,
        }
    }

    /// Create an instrument and apply its first price
    ///
    /// The seed goes through `set_price`, so day open/low/high all equal the
    /// seed and `last_change` is the delta from the unset zero.
    pub fn seeded(symbol: impl Into<Symbol>, price: Price) -> Result<Self, InstrumentError> {
        let mut instrument = Self::new(symbol);
        instrument.set_price(price)?;
        Ok(instrument)
    }

    /// Apply a new price and roll the day statistics forward
    pub fn set_price(&mut self, price: Price) -> Result<PriceUpdate, InstrumentError> {
        if price < Decimal::ZERO {
            return Err(InstrumentError::NegativePrice {
                symbol: self.symbol.clone(),
                price,
            });
        }

        if price == self.price {
            return Ok(PriceUpdate::Unchanged);
        }

        let previous = self.price;
        self.last_change = price - previous;
        self.price = price;

        if self.day_open.is_zero() {
            self.day_open = price;
        }
        if self.day_low.is_zero() || price < self.day_low {
            self.day_low = price;
        }
        if price > self.day_high {
            self.day_high = price;
        }

        Ok(PriceUpdate::Changed {
            previous,
            current: price,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn day_open(&self) -> Price {
        self.day_open
    }

    pub fn day_low(&self) -> Price {
        self.day_low
    }

    pub fn day_high(&self) -> Price {
        self.day_high
    }

    pub fn last_change(&self) -> Decimal {
        self.last_change
    }

    /// Move since the day open (price - day_open)
    pub fn change(&self) -> Decimal {
        self.price - self.day_open
    }

    /// `change / price` rounded to 4 decimal places
    ///
    /// Returns `None` when the price is zero.
    pub fn percent_change(&self) -> Option<Decimal> {
        self.change()
            .checked_div(self.price)
            .map(|ratio| ratio.round_dp(4))
    }

    /// Read model with derived fields computed
    pub fn snapshot(&self) -> InstrumentSnapshot {
        InstrumentSnapshot {
            symbol: self.symbol.clone(),
            price: self.price,
            day_open: self.day_open,
            day_low: self.day_low,
            day_high: self.day_high,
            last_change: self.last_change,
            change: self.change(),
            percent_change: self.percent_change(),
        }
    }
}
