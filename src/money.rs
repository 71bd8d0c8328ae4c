//! Omani rial amounts.
//!
//! Prices travel as `Decimal` and are rounded to baisa (three decimal places)
//! whenever a computed value leaves this crate.

use rust_decimal::{Decimal, RoundingStrategy};

pub const CURRENCY: &str = "OMR";
pub const SCALE: u32 = 3;

/// Build an amount from baisa, e.g. `omr(25_000)` is 25.000 OMR.
pub fn omr(baisa: i64) -> Decimal {
    Decimal::new(baisa, SCALE)
}

pub fn round_omr(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_baisa() {
        assert_eq!(round_omr(Decimal::new(12_3456, 4)), omr(12_346));
        assert_eq!(round_omr(Decimal::from(5)).to_string(), "5.000");
    }
}
