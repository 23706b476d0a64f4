//! Price and quantity extraction from unstructured retailer pages.
//!
//! The pipeline for one page is normalize → scan → infer quantity →
//! select → unit price. Pages share no schema, so every stage is a
//! heuristic with a fixed tie-break.

pub mod models;
pub mod normalize;
pub mod patterns;
pub mod quantity;
pub mod scanner;
pub mod select;

pub use models::{CandidateSource, ExtractionResult, MonetaryCandidate, PageReport, Quantity};
pub use normalize::{normalize, NormalizedPage, TaggedElement};
pub use quantity::infer_quantity;
pub use scanner::scan;
pub use select::{normalize_unit_price, select};

use crate::client::PageFetcher;
use crate::error::{ExtractError, ParseError};
use bigdecimal::BigDecimal;
use tracing::{debug, warn};

/// Extracts the total price and quantity from raw page bytes.
pub fn extract_page(page: &[u8], prefer_tax_included: bool) -> Result<ExtractionResult, ParseError> {
    let page = normalize(page)?;
    let candidates = scanner::scan_page(&page);

    if candidates.is_empty() {
        debug!("No price candidates on page");
        return Ok(ExtractionResult::absent());
    }

    let quantity = infer_quantity(page.flat_text());
    let total_price = select(&candidates, prefer_tax_included);
    debug!(
        "Selected {:?} from {} candidates (prefer VAT: {}), quantity {}",
        total_price.as_ref().map(ToString::to_string),
        candidates.len(),
        prefer_tax_included,
        quantity
    );

    Ok(ExtractionResult { total_price, quantity })
}

/// Fetches and extracts one URL, keeping errors typed.
pub async fn extract_url(
    fetcher: &impl PageFetcher,
    url: &str,
    prefer_tax_included: bool,
) -> Result<ExtractionResult, ExtractError> {
    let body = fetcher.fetch(url).await?;
    Ok(extract_page(&body, prefer_tax_included)?)
}

/// Fetches one URL and returns its per-unit price.
///
/// Fetch and parse failures are logged and resolve to `None`.
pub async fn extract_unit_price(
    fetcher: &impl PageFetcher,
    url: &str,
    prefer_tax_included: bool,
) -> Option<BigDecimal> {
    match extract_url(fetcher, url, prefer_tax_included).await {
        Ok(result) => result.unit_price(),
        Err(e) => {
            warn!("Could not extract price from {}: {}", url, e);
            None
        }
    }
}
