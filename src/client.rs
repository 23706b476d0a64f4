//! HTTP page fetching using wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use rand::Rng;
use regex_lite::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};
use wreq::header::{HeaderMap, CONTENT_TYPE};
use wreq::Client;
use wreq_util::Emulation;

/// Bytes of the body searched for a `<meta>` charset declaration.
const META_SNIFF_BYTES: usize = 1024;

static CHARSET_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?\s*([a-z0-9_.:-]+)"#).unwrap());

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?charset\s*=\s*["']?\s*([a-z0-9_.:-]+)"#).unwrap()
});

/// Trait for page fetching - enables canned pages in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a page body. The bytes are UTF-8 encoded HTML.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Retailer HTTP client with browser impersonation.
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl HttpFetcher {
    /// Creates a new fetcher with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
        })
    }

    /// Performs a GET request and returns the body as text.
    ///
    /// The charset comes from the Content-Type header, then from a `<meta>`
    /// tag near the top of the body, then defaults to UTF-8.
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.delay().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-GB,en;q=0.9")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let declared = header_charset(response.headers());
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(decode_body(&body, declared))
    }

    /// Adds a random delay to mimic human behavior.
    async fn delay(&self) {
        if self.delay_ms == 0 && self.delay_jitter_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = url.trim();
        if !url.starts_with("http") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        info!("Fetching: {}", url);
        self.get(url).await.map(String::into_bytes)
    }
}

fn header_charset(headers: &HeaderMap) -> Option<&'static Encoding> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let caps = CHARSET_PARAM.captures(content_type)?;
    Encoding::for_label(caps[1].as_bytes())
}

fn meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&body[..body.len().min(META_SNIFF_BYTES)]);
    let caps = META_CHARSET.captures(&head)?;
    Encoding::for_label(caps[1].as_bytes())
}

/// Transcodes a page body to UTF-8. Undecodable bytes become U+FFFD.
fn decode_body(body: &[u8], declared: Option<&'static Encoding>) -> String {
    let encoding = declared.or_else(|| meta_charset(body)).unwrap_or(UTF_8);
    debug!("Decoding body as {}", encoding.name());

    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        debug!("Body contained bytes invalid for {}", encoding.name());
    }
    text.into_owned()
}

fn transport_error(err: wreq::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}
