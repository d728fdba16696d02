use rust_decimal::Decimal;
use ticker_core::Price;

/// Port for price-walk policies
///
/// A walk is asked once per instrument per tick. Different implementations
/// support various movement models:
/// - Sparse random walk with a selection gate
/// - Price-seeded walk (legacy behaviour)
/// - Scripted walks for tests
pub trait PriceWalk: Send {
    /// Decide the signed move for an instrument at `price`
    ///
    /// Returns `None` when the instrument is not selected this tick. A
    /// returned delta of zero is allowed; the engine treats it as a no-op.
    fn next_move(&mut self, symbol: &str, price: Price) -> Option<Decimal>;

    /// Get the name of the walk
    fn name(&self) -> &str;
}
