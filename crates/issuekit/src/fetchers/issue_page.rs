//! Issue page fetcher
//!
//! Handles issue URLs on the accepted hosts (`www.drupal.org` unless
//! configured otherwise) and returns the page markup from a single GET.

use crate::client::FetchOptions;
use crate::error::IssueError;
use crate::fetchers::{FetchedPage, Fetcher};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Host accepted by default
pub const DEFAULT_ISSUE_HOST: &str = "www.drupal.org";

/// Request timeout (connect + full body); issue pages can be very large
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest body accepted before truncating
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Fetcher for issue pages
///
/// Matches URLs whose host is accepted and whose path contains an
/// `issues` segment followed by an identifier, e.g.
/// `https://www.drupal.org/project/eca/issues/3539583`.
pub struct IssuePageFetcher {
    hosts: Vec<String>,
}

impl IssuePageFetcher {
    /// Create a fetcher accepting the default host
    pub fn new() -> Self {
        Self::with_hosts([DEFAULT_ISSUE_HOST])
    }

    /// Create a fetcher accepting exactly the given hosts
    pub fn with_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepted hosts
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// True if the path has an `issues` segment followed by a non-empty one
    fn has_issue_path(url: &Url) -> bool {
        let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
        segments
            .windows(2)
            .any(|pair| pair[0] == "issues" && !pair[1].is_empty())
    }
}

impl Default for IssuePageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for IssuePageFetcher {
    fn name(&self) -> &'static str {
        "issue_page"
    }

    fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        self.hosts.iter().any(|h| h.eq_ignore_ascii_case(host)) && Self::has_issue_path(url)
    }

    async fn fetch(&self, url: &Url, options: &FetchOptions) -> Result<FetchedPage, IssueError> {
        let mut headers = HeaderMap::new();
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html, application/xhtml+xml, */*;q=0.8"),
        );

        let timeout = options.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(IssueError::ClientBuildError)?;

        let response = client
            .get(url.as_str())
            .send()
            .await
            .map_err(IssueError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(IssueError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let max_bytes = options.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES);
        let (body, truncated) = read_body_capped(response, max_bytes).await?;
        debug!(url = %url, bytes = body.len(), truncated, "Fetched issue page");

        Ok(FetchedPage {
            url: url.to_string(),
            status_code: status.as_u16(),
            content_type,
            body: String::from_utf8_lossy(&body).into_owned(),
            truncated,
        })
    }
}

/// Read response body up to `max_bytes`, reporting whether it was cut
async fn read_body_capped(
    response: reqwest::Response,
    max_bytes: usize,
) -> Result<(Bytes, bool), IssueError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(IssueError::from_reqwest)?;
        let remaining = max_bytes.saturating_sub(body.len());
        if bytes.len() > remaining {
            body.extend_from_slice(&bytes[..remaining]);
            warn!(max_bytes, "Issue page exceeds size cap, truncating");
            return Ok((Bytes::from(body), true));
        }
        body.extend_from_slice(&bytes);
    }

    Ok((Bytes::from(body), false))
}
