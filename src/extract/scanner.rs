//! Finds every currency amount on a page and tags it with VAT evidence.

use super::models::MonetaryCandidate;
use super::normalize::{NormalizedPage, TaggedElement};
use super::patterns::{CURRENCY_AMOUNT, TAX_MARKER, TAX_WINDOW_CHARS};
use bigdecimal::BigDecimal;
use std::str::FromStr;
use tracing::{debug, trace};

/// Scans a normalized page: structural candidates first, then free text.
pub fn scan_page(page: &NormalizedPage) -> Vec<MonetaryCandidate> {
    scan(page.flat_text(), page.tagged_elements())
}

/// Scans price-tagged elements, then every amount in the flat text.
///
/// Amounts are never filtered by magnitude here.
pub fn scan<'a>(
    flat_text: &str,
    tagged_elements: impl IntoIterator<Item = TaggedElement<'a>>,
) -> Vec<MonetaryCandidate> {
    let mut candidates = Vec::new();

    for element in tagged_elements {
        let Some(amount) = first_amount(&element.text) else {
            continue;
        };
        let has_vat = mentions_tax(&element.text);
        trace!("Structural candidate: {} (vat: {})", amount, has_vat);
        candidates.push(MonetaryCandidate::structural(amount, has_vat));
    }

    let structural = candidates.len();

    for caps in CURRENCY_AMOUNT.captures_iter(flat_text) {
        let Some(amount) = parse_amount(&caps[1]) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let context = char_window(flat_text, whole.start(), whole.end(), TAX_WINDOW_CHARS);
        let has_vat = mentions_tax(context);
        trace!("Free-text candidate: {} (vat: {})", amount, has_vat);
        candidates.push(MonetaryCandidate::free_text(amount, has_vat));
    }

    debug!(
        "Found {} candidates ({} structural, {} free-text)",
        candidates.len(),
        structural,
        candidates.len() - structural
    );

    candidates
}

/// Parses the first currency amount in `text`.
pub fn first_amount(text: &str) -> Option<BigDecimal> {
    CURRENCY_AMOUNT.captures(text).and_then(|caps| parse_amount(&caps[1]))
}

/// Parses matched digits like "1,823.45", dropping thousands separators.
fn parse_amount(digits: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(&digits.replace(',', "")).ok()
}

fn mentions_tax(text: &str) -> bool {
    text.to_lowercase().contains(TAX_MARKER)
}

/// Slice of `text` extending up to `radius` characters either side of
/// `start..end`, clipped to the text bounds.
fn char_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = match radius.checked_sub(1) {
        Some(back) => text[..start].char_indices().rev().nth(back).map_or(0, |(i, _)| i),
        None => start,
    };
    let to = text[end..].char_indices().nth(radius).map_or(text.len(), |(i, _)| end + i);
    &text[from..to]
}
