//! Comparison rows pairing a reference retailer's unit price with a competitor's.

use crate::spot::SpotPriceSet;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// Decides whether a product's competitor prices should prefer VAT-inclusive figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxPolicy {
    keywords: Vec<String>,
}

impl TaxPolicy {
    /// Creates a policy matching any of the given product-name substrings.
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { keywords: keywords.into_iter().map(|k| k.into().to_lowercase()).collect() }
    }

    /// Returns true if competitor prices for this product should include VAT.
    pub fn applies(&self, product: &str) -> bool {
        let product = product.to_lowercase();
        self.keywords.iter().any(|k| !k.is_empty() && product.contains(k.as_str()))
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self::new(["silver"])
    }
}

/// One product/competitor pair with derived difference metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub product: String,
    pub spot_price: Option<BigDecimal>,
    pub reference_price: BigDecimal,
    pub competitor_price: Option<BigDecimal>,
    /// Competitor minus reference, 2 decimals
    pub difference: Option<BigDecimal>,
    /// Difference as a percentage of the reference, 2 decimals
    pub percent_difference: Option<BigDecimal>,
    pub reference_url: String,
    pub competitor_url: String,
}

impl ComparisonRow {
    /// Builds a row and its difference metrics.
    ///
    /// A zero competitor price counts as missing for the metrics.
    pub fn new(
        product: impl Into<String>,
        spot_price: Option<BigDecimal>,
        reference_price: BigDecimal,
        competitor_price: Option<BigDecimal>,
        reference_url: impl Into<String>,
        competitor_url: impl Into<String>,
    ) -> Self {
        let (difference, percent_difference) =
            match competitor_price.as_ref().filter(|p| !p.is_zero()) {
                Some(competitor) if !reference_price.is_zero() => {
                    let diff = competitor - &reference_price;
                    let pct = &diff / &reference_price * BigDecimal::from(100);
                    (Some(diff.round(2)), Some(pct.round(2)))
                }
                _ => (None, None),
            };

        Self {
            product: product.into(),
            spot_price,
            reference_price,
            competitor_price,
            difference,
            percent_difference,
            reference_url: reference_url.into(),
            competitor_url: competitor_url.into(),
        }
    }

    /// Returns true if the competitor is cheaper per unit.
    pub fn competitor_cheaper(&self) -> bool {
        self.difference.as_ref().is_some_and(|d| d < &BigDecimal::zero())
    }
}

/// Result of a comparison batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareReport {
    /// Spot prices resolved for the batch
    pub spot: SpotPriceSet,
    /// One row per product/competitor pair, in sheet order
    pub rows: Vec<ComparisonRow>,
    /// Products skipped because the reference price was unextractable
    pub warnings: Vec<String>,
}

impl CompareReport {
    /// Returns true if no comparisons were produced.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
