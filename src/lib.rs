//! bullion-compare - Bullion price comparison across retailer pages
//!
//! Extracts total prices and pack quantities from unstructured retailer
//! pages, normalizes them to per-unit prices, and compares competitors
//! against a reference retailer alongside live spot prices.

pub mod client;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod sheet;
pub mod spot;

pub use client::{HttpFetcher, PageFetcher};
pub use comparison::{CompareReport, ComparisonRow, TaxPolicy};
pub use config::Config;
pub use error::{ExtractError, FetchError, ParseError};
pub use extract::{extract_page, extract_url, ExtractionResult, PageReport, Quantity};
pub use sheet::ProductRow;
pub use spot::{Metal, SpotPriceSet};
