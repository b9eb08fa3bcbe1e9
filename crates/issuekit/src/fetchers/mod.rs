//! Page fetchers
//!
//! Design: a fetcher declares which URLs it accepts via `matches()` and
//! retrieves raw markup via `fetch()`. URL validation happens before any
//! network traffic, so a rejected URL never reaches the wire.

mod issue_page;

pub use issue_page::{IssuePageFetcher, DEFAULT_ISSUE_HOST};

use crate::client::FetchOptions;
use crate::error::IssueError;
use async_trait::async_trait;
use url::Url;

/// Raw page as returned by a fetcher
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// The fetched URL
    pub url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Page markup
    pub body: String,
    /// True if the body was cut at the size cap
    pub truncated: bool,
}

/// Trait for page fetchers
///
/// Implement this trait to fetch issue pages from another tracker or
/// to serve fixture markup in tests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Returns true if this fetcher can handle the given URL
    fn matches(&self, url: &Url) -> bool;

    /// Fetch the page markup
    ///
    /// Called only if `matches()` returned true.
    async fn fetch(&self, url: &Url, options: &FetchOptions) -> Result<FetchedPage, IssueError>;
}

/// Validate the shape of a URL string before matching
///
/// Rejects empty input and non-http(s) schemes.
pub fn validate_url(url: &str) -> Result<Url, IssueError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(IssueError::MissingUrl);
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(IssueError::InvalidUrlScheme);
    }

    Url::parse(url).map_err(|_| IssueError::InvalidIssueUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(matches!(validate_url(""), Err(IssueError::MissingUrl)));
        assert!(matches!(validate_url("   "), Err(IssueError::MissingUrl)));
        assert!(matches!(
            validate_url("ftp://www.drupal.org/project/eca/issues/1"),
            Err(IssueError::InvalidUrlScheme)
        ));
        assert!(matches!(
            validate_url("https://"),
            Err(IssueError::InvalidIssueUrl(_))
        ));

        let url = validate_url(" https://www.drupal.org/project/eca/issues/3539583 ").unwrap();
        assert_eq!(url.host_str(), Some("www.drupal.org"));
    }
}
