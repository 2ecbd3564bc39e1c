use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, halves away from zero.
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(dec!(1.234)), dec!(1.23));
        assert_eq!(round_to_cents(dec!(1.235)), dec!(1.24));
        assert_eq!(round_to_cents(dec!(-1.235)), dec!(-1.24));
        assert_eq!(round_to_cents(dec!(150)), dec!(150));
    }
}
