//! Data models for live metal spot prices.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A precious metal with a quoted spot price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metal {
    Gold,
    Silver,
}

impl Metal {
    /// Returns all metals.
    pub fn all() -> &'static [Metal] {
        &[Metal::Gold, Metal::Silver]
    }

    /// Label preceding this metal's price on the spot page.
    pub fn label(self) -> &'static str {
        match self {
            Metal::Gold => "Gold Price",
            Metal::Silver => "Silver Price",
        }
    }

    /// Guesses the metal from a product name such as "1oz Silver Britannia".
    pub fn from_product_name(name: &str) -> Option<Metal> {
        let name = name.to_lowercase();
        if name.contains("silver") {
            Some(Metal::Silver)
        } else if name.contains("gold") {
            Some(Metal::Gold)
        } else {
            None
        }
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metal::Gold => write!(f, "gold"),
            Metal::Silver => write!(f, "silver"),
        }
    }
}

/// Spot prices resolved once per batch. Missing values stay unknown, never zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotPriceSet {
    pub gold: Option<BigDecimal>,
    pub silver: Option<BigDecimal>,
}

impl SpotPriceSet {
    /// Returns the price for a metal.
    pub fn get(&self, metal: Metal) -> Option<&BigDecimal> {
        match metal {
            Metal::Gold => self.gold.as_ref(),
            Metal::Silver => self.silver.as_ref(),
        }
    }

    /// Returns the spot price matching the metal named in a product.
    pub fn for_product(&self, product: &str) -> Option<&BigDecimal> {
        Metal::from_product_name(product).and_then(|metal| self.get(metal))
    }

    /// Returns true if no metal has a price.
    pub fn is_empty(&self) -> bool {
        self.gold.is_none() && self.silver.is_none()
    }
}
