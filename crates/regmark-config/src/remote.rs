//! Remote rule set fetching
//!
//! A hosting application can serve a rule file as a static asset; the store
//! fetches it at startup and falls back to the active config on any failure.

use regmark_engine::MAX_RULE_FILE_SIZE;
use thiserror::Error;
use url::Url;

/// Remote fetch failures (recovered by the store, never surfaced as fatal)
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rule file exceeds {MAX_RULE_FILE_SIZE} bytes")]
    TooLarge,
}

/// Fetch a rule file body from a remote URL
///
/// The body is returned as text; decoding and validation stay with the
/// store so remote and imported rule files go through the same path.
pub async fn fetch_rules(url: &Url) -> Result<String, FetchError> {
    let response = reqwest::get(url.clone()).await?.error_for_status()?;

    if let Some(len) = response.content_length() {
        if len > MAX_RULE_FILE_SIZE {
            return Err(FetchError::TooLarge);
        }
    }

    let body = response.text().await?;
    if body.len() as u64 > MAX_RULE_FILE_SIZE {
        return Err(FetchError::TooLarge);
    }

    Ok(body)
}
