//! Regex patterns and CSS selectors used by the extraction engine.
//!
//! Retailer pages share no schema, so everything here is heuristic.
//! When a page is misread, capture its HTML, adjust the pattern here,
//! and add the page as a test case.

use regex_lite::Regex;
use scraper::Selector;
use std::sync::LazyLock;

/// Substring of a class or id attribute that marks a price element.
pub const PRICE_HINT: &str = "price";

/// Marker for a tax-inclusive price.
pub const TAX_MARKER: &str = "vat";

/// Characters inspected on each side of a free-text match for the tax marker.
pub const TAX_WINDOW_CHARS: usize = 30;

/// Currency amount: pound sign, optional whitespace, then either
/// comma-grouped thousands or a plain digit run, with up to two decimals.
/// Group 1 holds the number.
pub static CURRENCY_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"£[\s\x{A0}]*((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,2})?)").unwrap()
});

/// Elements carrying a class or id attribute; filtered by [`PRICE_HINT`] in code.
pub static ATTRIBUTED_ELEMENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class], [id]").unwrap());

/// Quantity patterns, one per family. Group 1 holds the count.
pub mod quantity {
    use super::*;

    /// "10 coins", "25pcs", "5 units"
    pub static COUNT_THEN_UNIT: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\b(\d{1,3})\s*(?:coins?|pcs?|pieces?|units?)\b").unwrap()
    });

    /// "tube of 25", "Monster Box: 500", "roll 20"
    pub static CONTAINER_THEN_COUNT: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)\b(?:monster box|pack|tube|box|roll)\D{0,10}(\d{1,3})\b").unwrap()
    });

    /// "x 500", "1x25"
    pub static MULTIPLIER: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)(?:^|[^a-z])x\s?(\d{1,3})\b").unwrap());
}

/// Labels anchoring spot prices on the reference page.
pub mod spot {
    use super::*;

    pub static GOLD_LABEL: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)gold price").unwrap());

    pub static SILVER_LABEL: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)silver price").unwrap());
}
