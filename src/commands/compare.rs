//! Batch comparison command: reference retailer vs competitors, per product.

use crate::client::{HttpFetcher, PageFetcher};
use crate::comparison::{CompareReport, ComparisonRow, TaxPolicy};
use crate::config::Config;
use crate::extract::extract_unit_price;
use crate::sheet::{load_sheet, ProductRow};
use crate::spot::{fetch_spot_prices, SpotPriceSet};
use anyhow::{Context, Result};
use bigdecimal::Zero;
use std::path::Path;
use tracing::{info, warn};

/// Compares every product in a sheet against its competitors.
pub struct CompareCommand {
    config: Config,
}

impl CompareCommand {
    /// Creates a new compare command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Loads the sheet and runs the comparison over HTTP.
    pub async fn execute(&self, sheet: &Path) -> Result<CompareReport> {
        let rows = load_sheet(sheet)?;
        let fetcher = HttpFetcher::new(&self.config).context("Failed to create HTTP client")?;

        Ok(self.execute_with_fetcher(&fetcher, &rows).await)
    }

    /// Runs the comparison with a provided fetcher (for testing).
    ///
    /// Never fails: unextractable pages become missing prices or skipped products.
    pub async fn execute_with_fetcher(
        &self,
        fetcher: &impl PageFetcher,
        rows: &[ProductRow],
    ) -> CompareReport {
        let spot = match &self.config.spot_price_url {
            Some(url) => fetch_spot_prices(fetcher, url).await,
            None => SpotPriceSet::default(),
        };

        let policy = TaxPolicy::new(self.config.tax_keywords.iter().cloned());
        let mut report = CompareReport { spot, ..CompareReport::default() };

        for row in rows {
            info!("Comparing: {}", row.product_name);

            let reference = extract_unit_price(fetcher, &row.reference_url, false).await;
            let Some(reference) = reference.filter(|p| !p.is_zero()) else {
                let message = format!("Could not extract reference price for {}", row.product_name);
                warn!("{}", message);
                report.warnings.push(message);
                continue;
            };

            let prefer_tax_included = policy.applies(&row.product_name);
            let spot_price = report.spot.for_product(&row.product_name).cloned();

            for competitor_url in &row.competitor_urls {
                let competitor =
                    extract_unit_price(fetcher, competitor_url, prefer_tax_included).await;

                report.rows.push(ComparisonRow::new(
                    row.product_name.as_str(),
                    spot_price.clone(),
                    reference.clone(),
                    competitor,
                    row.reference_url.as_str(),
                    competitor_url.as_str(),
                ));
            }
        }

        info!(
            "Produced {} comparisons ({} products skipped)",
            report.rows.len(),
            report.warnings.len()
        );

        report
    }
}
