//! Data models for price candidates, quantities, and extraction results.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where on the page a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Inside an element whose class or id mentions "price"
    Structural,
    /// Anywhere in the flattened page text
    FreeText,
}

/// One currency amount found on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryCandidate {
    /// Parsed amount, thousands separators removed
    pub amount: BigDecimal,
    /// Whether nearby text mentions VAT
    pub tax_included_hint: bool,
    /// Pass that produced this candidate
    pub source: CandidateSource,
}

impl MonetaryCandidate {
    /// Creates a candidate from the structural pass.
    pub fn structural(amount: BigDecimal, tax_included_hint: bool) -> Self {
        Self { amount, tax_included_hint, source: CandidateSource::Structural }
    }

    /// Creates a candidate from the free-text pass.
    pub fn free_text(amount: BigDecimal, tax_included_hint: bool) -> Self {
        Self { amount, tax_included_hint, source: CandidateSource::FreeText }
    }
}

/// Number of physical units a listed price covers. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit, the estimate when nothing else is inferred.
    pub const ONE: Quantity = Quantity(1);

    /// Exclusive upper bound for counts read from page text.
    pub const INFERRED_MAX: u32 = 1000;

    /// Accepts a count read from page text only if `1 < count < 1000`.
    pub fn from_inferred(count: u32) -> Option<Self> {
        if count > 1 && count < Self::INFERRED_MAX {
            Some(Self(count))
        } else {
            None
        }
    }

    /// Returns the count.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of extracting one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Selected total price, `None` when no candidate was found
    pub total_price: Option<BigDecimal>,
    /// Units covered by the total price
    pub quantity: Quantity,
}

impl ExtractionResult {
    /// Result for a page with no usable price.
    pub fn absent() -> Self {
        Self::default()
    }

    /// Returns the total price divided by the quantity.
    pub fn unit_price(&self) -> Option<BigDecimal> {
        super::select::normalize_unit_price(self.total_price.as_ref(), self.quantity)
    }
}

/// Extraction of a single URL, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReport {
    pub url: String,
    pub prefer_tax_included: bool,
    pub total_price: Option<BigDecimal>,
    pub quantity: Quantity,
    pub unit_price: Option<BigDecimal>,
}

impl PageReport {
    /// Builds a report from an extraction result.
    pub fn new(url: impl Into<String>, prefer_tax_included: bool, result: ExtractionResult) -> Self {
        let unit_price = result.unit_price();
        Self {
            url: url.into(),
            prefer_tax_included,
            total_price: result.total_price,
            quantity: result.quantity,
            unit_price,
        }
    }
}
