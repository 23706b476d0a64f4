//! Infers how many units a page's price covers.

use super::models::Quantity;
use super::patterns::quantity::{CONTAINER_THEN_COUNT, COUNT_THEN_UNIT, MULTIPLIER};
use regex_lite::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// The kind of wording a quantity pattern looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityFamily {
    /// "10 coins"
    CountThenUnit,
    /// "tube of 25"
    ContainerThenCount,
    /// "x 500"
    Multiplier,
}

/// Pattern families in priority order. The first valid match wins.
pub static FAMILIES: [(QuantityFamily, &LazyLock<Regex>); 3] = [
    (QuantityFamily::CountThenUnit, &COUNT_THEN_UNIT),
    (QuantityFamily::ContainerThenCount, &CONTAINER_THEN_COUNT),
    (QuantityFamily::Multiplier, &MULTIPLIER),
];

/// Returns the units covered by the page's price, defaulting to one.
///
/// Each family contributes only its first match. A match outside
/// `2..=999` is skipped and the next family is tried.
pub fn infer_quantity(flat_text: &str) -> Quantity {
    for (family, pattern) in FAMILIES.iter() {
        let Some(caps) = pattern.captures(flat_text) else {
            continue;
        };

        let Ok(count) = caps[1].parse::<u32>() else {
            continue;
        };

        match Quantity::from_inferred(count) {
            Some(quantity) => {
                debug!("Inferred quantity {} from {:?}", quantity, family);
                return quantity;
            }
            None => trace!("Rejected count {} from {:?}", count, family),
        }
    }

    Quantity::ONE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qty(text: &str) -> u32 {
        infer_quantity(text).get()
    }

    #[test]
    fn test_count_then_unit() {
        assert_eq!(qty("Tube of 10 coins"), 10);
        assert_eq!(qty("25pcs in stock"), 25);
        assert_eq!(qty("Lot of 3 pieces"), 3);
        assert_eq!(qty("5 units"), 5);
        assert_eq!(qty("2 COINS"), 2);
        assert_eq!(qty("20 pc"), 20);
    }

    #[test]
    fn test_container_then_count() {
        assert_eq!(qty("Silver Britannia tube of 25"), 25);
        assert_eq!(qty("Monster Box: 500"), 500);
        assert_eq!(qty("Roll - 20"), 20);
        assert_eq!(qty("pack(5)"), 5);
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(qty("Krugerrand x 500"), 500);
        assert_eq!(qty("1x25 Maple"), 25);
        assert_eq!(qty("Maple X10"), 10);
    }

    #[test]
    fn test_default_is_one() {
        assert_eq!(qty(""), 1);
        assert_eq!(qty("1oz Gold Britannia"), 1);
        assert_eq!(qty("Only £45.00"), 1);
    }

    #[test]
    fn test_priority_order() {
        // Unit wording beats container wording
        assert_eq!(qty("box of 20, contains 10 coins"), 10);
        // Container wording beats multiplier
        assert_eq!(qty("x 5 tube of 25"), 25);
    }

    #[test]
    fn test_out_of_range_falls_through() {
        // "1 coin" is rejected, so the container family decides
        assert_eq!(qty("1 coin per slot, tube of 25"), 25);
        // Only the first match of a family is considered
        assert_eq!(qty("1 coin, 10 coins"), 1);
    }

    #[test]
    fn test_large_counts_never_accepted() {
        assert_eq!(qty("1000 coins"), 1);
        assert_eq!(qty("box of 1000"), 1);
        assert_eq!(qty("x 2500"), 1);
    }

    #[test]
    fn test_zero_rejected() {
        assert_eq!(qty("0 units left"), 1);
    }

    #[test]
    fn test_bounds_hold() {
        for text in ["999 coins", "x 2", "tube of 998", "pack 1", "x 0"] {
            let q = qty(text);
            assert!((1..1000).contains(&q), "{} gave {}", text, q);
        }
    }
}
