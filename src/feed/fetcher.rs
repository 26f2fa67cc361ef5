//! Retrieves and decodes the remote feed.
//!
//! One plain GET per cycle: no retry, no backoff, no deadline. The
//! scheduler's next tick is the retry policy.

use thiserror::Error;

use crate::feed::parser::{self, ParseError, ParseOutcome};

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),
    /// Response body was not a valid calendar document
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
) -> Result<ParseOutcome, FetchError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = response.bytes().await?;
    Ok(parser::parse_feed(&bytes)?)
}
