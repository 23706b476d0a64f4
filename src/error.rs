//! Error types for page fetching and extraction.
//!
//! None of these abort a comparison batch: the boundary in
//! [`crate::extract::extract_unit_price`] logs them and resolves the
//! affected URL to an absent price.

use thiserror::Error;

/// Transport-level failure while fetching a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status code.
    #[error("request failed with status: {0}")]
    Status(u16),

    /// DNS, TLS, connection or body read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The URL is not an http(s) URL.
    #[error("invalid URL: '{0}'")]
    InvalidUrl(String),
}

/// Page content that cannot be turned into text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("page body is not valid UTF-8")]
    InvalidEncoding,

    #[error("page body is empty")]
    EmptyDocument,
}

/// Any failure that makes a single page unextractable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
}
