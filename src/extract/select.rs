//! Picks one authoritative price from the candidates and derives the unit price.

use super::models::{MonetaryCandidate, Quantity};
use bigdecimal::BigDecimal;

/// Selects the page's total price.
///
/// Without a tax preference the cheapest figure wins. With one, the
/// highest VAT-tagged figure wins, falling back to the highest overall.
pub fn select(candidates: &[MonetaryCandidate], prefer_tax_included: bool) -> Option<BigDecimal> {
    let amounts = || candidates.iter().map(|c| &c.amount);

    let selected = if prefer_tax_included {
        candidates
            .iter()
            .filter(|c| c.tax_included_hint)
            .map(|c| &c.amount)
            .max()
            .or_else(|| amounts().max())
    } else {
        amounts().min()
    };

    selected.cloned()
}

/// Divides a total price by the quantity it covers.
pub fn normalize_unit_price(
    total_price: Option<&BigDecimal>,
    quantity: Quantity,
) -> Option<BigDecimal> {
    let total = total_price?;
    let divisor = BigDecimal::from(quantity.get().max(1));
    Some(total.clone() / divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn cand(amount: &str, vat: bool) -> MonetaryCandidate {
        MonetaryCandidate::free_text(dec(amount), vat)
    }

    #[test]
    fn test_empty_is_absent() {
        assert_eq!(select(&[], false), None);
        assert_eq!(select(&[], true), None);
    }

    #[test]
    fn test_cheapest_without_preference() {
        let candidates = vec![cand("50.00", false), cand("48.00", false)];
        assert_eq!(select(&candidates, false), Some(dec("48.00")));
    }

    #[test]
    fn test_cheapest_ignores_vat_hint() {
        let candidates = vec![cand("50.00", true), cand("41.67", false)];
        assert_eq!(select(&candidates, false), Some(dec("41.67")));
    }

    #[test]
    fn test_preference_takes_highest_vat_tagged() {
        let candidates = vec![
            cand("30.00", true),
            cand("36.00", true),
            cand("99.00", false),
        ];
        assert_eq!(select(&candidates, true), Some(dec("36.00")));
    }

    #[test]
    fn test_preference_falls_back_to_highest() {
        let candidates = vec![cand("30.00", false), cand("36.00", false), cand("12.00", false)];
        assert_eq!(select(&candidates, true), Some(dec("36.00")));
    }

    #[test]
    fn test_duplicates_select_amount() {
        let candidates = vec![cand("45.00", true), cand("45.00", true)];
        assert_eq!(select(&candidates, true), Some(dec("45")));
        assert_eq!(select(&candidates, false), Some(dec("45")));
    }

    #[test]
    fn test_selection_monotonic() {
        let sets = vec![
            vec![cand("10", false)],
            vec![cand("10", true), cand("20", false)],
            vec![cand("5", false), cand("7", true), cand("3", false)],
            vec![cand("1000", false), cand("999.99", false)],
        ];
        for candidates in sets {
            let low = select(&candidates, false).unwrap();
            let high = select(&candidates, true).unwrap();
            assert!(low <= high, "{} > {}", low, high);
        }
    }

    #[test]
    fn test_unit_price() {
        let q = Quantity::from_inferred(10).unwrap();
        assert_eq!(normalize_unit_price(Some(&dec("45.00")), q), Some(dec("4.50")));
        assert_eq!(normalize_unit_price(Some(&dec("45.00")), Quantity::ONE), Some(dec("45")));
    }

    #[test]
    fn test_unit_price_absent_propagates() {
        for q in [Quantity::ONE, Quantity::from_inferred(25).unwrap()] {
            assert_eq!(normalize_unit_price(None, q), None);
        }
    }

    #[test]
    fn test_unit_price_inexact_division() {
        let q = Quantity::from_inferred(3).unwrap();
        let unit = normalize_unit_price(Some(&dec("10")), q).unwrap();
        assert_eq!(unit.round(2), dec("3.33"));
    }
}
