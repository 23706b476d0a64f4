//! Single-page extraction command.

use crate::client::{HttpFetcher, PageFetcher};
use crate::config::Config;
use crate::extract::{extract_url, PageReport};
use anyhow::{Context, Result};
use tracing::info;

/// Extracts the price and quantity from one URL.
pub struct ExtractCommand {
    config: Config,
}

impl ExtractCommand {
    /// Creates a new extract command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches the page over HTTP and extracts it.
    pub async fn execute(&self, url: &str, prefer_tax_included: bool) -> Result<PageReport> {
        let fetcher = HttpFetcher::new(&self.config).context("Failed to create HTTP client")?;
        self.execute_with_fetcher(&fetcher, url, prefer_tax_included).await
    }

    /// Extracts a page with a provided fetcher (for testing).
    pub async fn execute_with_fetcher(
        &self,
        fetcher: &impl PageFetcher,
        url: &str,
        prefer_tax_included: bool,
    ) -> Result<PageReport> {
        let url = url.trim();
        info!("Extracting: {}", url);

        let result = extract_url(fetcher, url, prefer_tax_included)
            .await
            .with_context(|| format!("Failed to extract {}", url))?;

        Ok(PageReport::new(url, prefer_tax_included, result))
    }
}
