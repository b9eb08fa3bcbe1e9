//! Entry points for fetching and parsing issue pages
//!
//! The fetch itself is implemented by fetchers in the
//! [`fetchers`](crate::fetchers) module. Everything after the fetch is
//! synchronous and never fails.

use crate::error::IssueError;
use crate::fetchers::{validate_url, FetchedPage, Fetcher, IssuePageFetcher};
use crate::tool::IssueAnalyzer;
use crate::types::ParsedIssue;
use std::time::Duration;
use tracing::debug;

/// Fetch options that can be configured via the analyzer builder
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Request timeout (connect and full body)
    pub timeout: Option<Duration>,
    /// Body size cap in bytes
    pub max_body_bytes: Option<usize>,
}

/// Fetch an issue page with the default fetcher and options
pub async fn fetch_page(url: &str) -> Result<FetchedPage, IssueError> {
    fetch_page_with(url, &IssuePageFetcher::new(), &FetchOptions::default()).await
}

/// Fetch an issue page with a specific fetcher
///
/// The URL is validated and matched before any network traffic; a URL the
/// fetcher does not accept is an [`IssueError::InvalidIssueUrl`].
pub async fn fetch_page_with(
    url: &str,
    fetcher: &dyn Fetcher,
    options: &FetchOptions,
) -> Result<FetchedPage, IssueError> {
    let parsed = validate_url(url)?;

    if !fetcher.matches(&parsed) {
        return Err(IssueError::InvalidIssueUrl(url.trim().to_string()));
    }

    debug!(url = %parsed, fetcher = fetcher.name(), "Fetching issue page");
    fetcher.fetch(&parsed, options).await
}

/// Fetch and parse an issue with default settings
///
/// For custom hosts, timeouts or a completion provider, use
/// [`IssueAnalyzer::builder`].
pub async fn parse_issue(url: &str) -> Result<ParsedIssue, IssueError> {
    IssueAnalyzer::default().parse_issue(url).await
}
