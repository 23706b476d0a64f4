//! Spot price lookup command.

use crate::client::{HttpFetcher, PageFetcher};
use crate::config::Config;
use crate::spot::{fetch_spot_prices, SpotPriceSet};
use anyhow::{Context, Result};
use tracing::info;

/// Resolves gold and silver spot prices from a reference page.
pub struct SpotCommand {
    config: Config,
}

impl SpotCommand {
    /// Creates a new spot command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves spot prices from `url`, falling back to the configured spot page.
    pub async fn execute(&self, url: Option<&str>) -> Result<SpotPriceSet> {
        let fetcher = HttpFetcher::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_fetcher(&fetcher, url).await
    }

    /// Resolves spot prices with a provided fetcher (for testing).
    pub async fn execute_with_fetcher(
        &self,
        fetcher: &impl PageFetcher,
        url: Option<&str>,
    ) -> Result<SpotPriceSet> {
        let Some(url) = url.or(self.config.spot_price_url.as_deref()) else {
            anyhow::bail!("No spot price URL given. Pass one or set spot_price_url in the config.");
        };

        info!("Resolving spot prices from: {}", url);
        Ok(fetch_spot_prices(fetcher, url).await)
    }
}
