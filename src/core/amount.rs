//! Rounding and canonical string forms for amounts.
//!
//! Monetary amounts are rounded to two places with commercial (half-up)
//! rounding and always printed with exactly two decimals. Quantities are
//! printed with four.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to `dp` decimal places, ties away from zero.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a monetary amount to cents.
pub fn round2(value: Decimal) -> Decimal {
    round_half_up(value, 2)
}

/// Canonical two-decimal form, e.g. `23.80`.
pub fn format2dec(value: Decimal) -> String {
    fixed(value, 2)
}

/// Canonical four-decimal form used for quantities, e.g. `2.0000`.
pub fn format4dec(value: Decimal) -> String {
    fixed(value, 4)
}

fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = round_half_up(value, dp);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(dp);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn tiny_negatives_print_as_zero() {
        assert_eq!(format2dec(dec!(-0.001)), "0.00");
    }

    #[test]
    fn half_up_ties() {
        assert_eq!(format2dec(dec!(2.345)), "2.35");
        assert_eq!(format2dec(dec!(2.344)), "2.34");
        assert_eq!(format2dec(dec!(0.005)), "0.01");
        assert_eq!(format2dec(dec!(-2.345)), "-2.35");
    }

    #[test]
    fn pads_to_two_places() {
        assert_eq!(format2dec(dec!(19)), "19.00");
        assert_eq!(format2dec(dec!(23.8)), "23.80");
        assert_eq!(format2dec(Decimal::ZERO), "0.00");
    }

    #[test]
    fn quantities_use_four_places() {
        assert_eq!(format4dec(dec!(2)), "2.0000");
        assert_eq!(format4dec(dec!(1.23456)), "1.2346");
    }

    #[test]
    fn formatting_is_idempotent() {
        let once = format2dec(dec!(1833.475));
        let twice = format2dec(once.parse().unwrap());
        assert_eq!(once, "1833.48");
        assert_eq!(once, twice);
    }

    #[test]
    fn round2_keeps_value() {
        assert_eq!(round2(dec!(3.8)), dec!(3.80));
        assert_eq!(round2(dec!(0.125)), dec!(0.13));
    }
}
