//! Reads gold and silver spot prices from a reference page.

use super::models::{Metal, SpotPriceSet};
use crate::client::PageFetcher;
use crate::extract::normalize;
use crate::extract::patterns::spot::{GOLD_LABEL, SILVER_LABEL};
use crate::extract::scanner::first_amount;
use bigdecimal::BigDecimal;
use regex_lite::Regex;
use tracing::{debug, info, warn};

/// Resolves spot prices from page bytes.
///
/// An unparseable page yields an empty set rather than an error.
pub fn resolve_spot_prices(reference_page: &[u8]) -> SpotPriceSet {
    let page = match normalize(reference_page) {
        Ok(page) => page,
        Err(e) => {
            warn!("Could not parse spot price page: {}", e);
            return SpotPriceSet::default();
        }
    };

    let text = page.flat_text();
    let spot = SpotPriceSet {
        gold: labeled_price(text, Metal::Gold),
        silver: labeled_price(text, Metal::Silver),
    };

    debug!("Resolved spot prices: {:?}", spot);
    spot
}

/// Fetches the spot page and resolves it. Fetch failures yield an empty set.
pub async fn fetch_spot_prices(fetcher: &impl PageFetcher, url: &str) -> SpotPriceSet {
    info!("Resolving spot prices from {}", url);

    match fetcher.fetch(url).await {
        Ok(body) => resolve_spot_prices(&body),
        Err(e) => {
            warn!("Could not fetch spot price page {}: {}", url, e);
            SpotPriceSet::default()
        }
    }
}

/// First currency amount following the metal's label.
fn labeled_price(text: &str, metal: Metal) -> Option<BigDecimal> {
    let label = label_pattern(metal).find(text)?;
    let price = first_amount(&text[label.end()..]);

    if price.is_none() {
        debug!("No amount after '{}' label", metal.label());
    }
    price
}

fn label_pattern(metal: Metal) -> &'static Regex {
    match metal {
        Metal::Gold => &GOLD_LABEL,
        Metal::Silver => &SILVER_LABEL,
    }
}
