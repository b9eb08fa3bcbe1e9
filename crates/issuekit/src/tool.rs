//! Analyzer builder and contract

use crate::analysis::parse_analysis;
use crate::client::{fetch_page_with, FetchOptions};
use crate::completion::CompletionProvider;
use crate::error::IssueError;
use crate::extract::parse_issue_markup;
use crate::fetchers::{validate_url, Fetcher, IssuePageFetcher, DEFAULT_ISSUE_HOST};
use crate::prompt::{build_prompt, PromptStrategy};
use crate::size::assess_size;
use crate::types::{AnalysisResult, ParsedIssue, SizeAssessment};
use crate::TOOL_DESCRIPTION;
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Status update during analyzer execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStatus {
    /// Current phase ("validate", "fetch", "extract", "complete")
    pub phase: String,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Estimated completion percentage (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f32>,
}

impl ToolStatus {
    /// Create a new status with phase
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            message: None,
            percent_complete: None,
        }
    }

    /// Set message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set completion percentage
    pub fn with_percent(mut self, percent: f32) -> Self {
        self.percent_complete = Some(percent);
        self
    }
}

/// Builder for configuring the issue analyzer
#[derive(Clone, Default)]
pub struct IssueAnalyzerBuilder {
    /// Custom User-Agent
    user_agent: Option<String>,
    /// Request timeout
    timeout: Option<Duration>,
    /// Body size cap in bytes
    max_body_bytes: Option<usize>,
    /// Accepted issue hosts
    hosts: Vec<String>,
    /// Truncate prompts for oversized issues
    truncate_oversized: bool,
    /// Fetcher override
    fetcher: Option<Arc<dyn Fetcher>>,
    /// Completion backend
    completion: Option<Arc<dyn CompletionProvider>>,
}

impl IssueAnalyzerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set body size cap
    pub fn max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = Some(max);
        self
    }

    /// Accept issue URLs on `host`
    ///
    /// Without any accepted host the analyzer accepts `www.drupal.org`.
    pub fn accept_host(mut self, host: impl Into<String>) -> Self {
        self.hosts.push(host.into());
        self
    }

    /// Use the truncated rendering when an issue is oversized
    pub fn truncate_oversized(mut self, enable: bool) -> Self {
        self.truncate_oversized = enable;
        self
    }

    /// Replace the page fetcher
    ///
    /// The replacement decides which URLs it accepts; accepted hosts are
    /// ignored.
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Set the completion provider used by [`IssueAnalyzer::analyze`]
    pub fn completion_provider(mut self, provider: impl CompletionProvider + 'static) -> Self {
        self.completion = Some(Arc::new(provider));
        self
    }

    /// Build the analyzer
    pub fn build(self) -> IssueAnalyzer {
        let fetcher = self.fetcher.unwrap_or_else(|| {
            let fetcher = if self.hosts.is_empty() {
                IssuePageFetcher::with_hosts([DEFAULT_ISSUE_HOST])
            } else {
                IssuePageFetcher::with_hosts(self.hosts)
            };
            Arc::new(fetcher) as Arc<dyn Fetcher>
        });

        IssueAnalyzer {
            options: FetchOptions {
                user_agent: self.user_agent,
                timeout: self.timeout,
                max_body_bytes: self.max_body_bytes,
            },
            truncate_oversized: self.truncate_oversized,
            fetcher,
            completion: self.completion,
        }
    }
}

impl fmt::Debug for IssueAnalyzerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueAnalyzerBuilder")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("hosts", &self.hosts)
            .field("truncate_oversized", &self.truncate_oversized)
            .field("fetcher", &self.fetcher.as_ref().map(|f| f.name()))
            .field("completion", &self.completion.as_ref().map(|c| c.name()))
            .finish()
    }
}

/// Configured issue analyzer
///
/// Fetches an issue page, extracts a [`ParsedIssue`], renders the analysis
/// prompt, and decodes a completion into an [`AnalysisResult`].
#[derive(Clone)]
pub struct IssueAnalyzer {
    options: FetchOptions,
    truncate_oversized: bool,
    fetcher: Arc<dyn Fetcher>,
    completion: Option<Arc<dyn CompletionProvider>>,
}

impl Default for IssueAnalyzer {
    fn default() -> Self {
        IssueAnalyzerBuilder::new().build()
    }
}

impl fmt::Debug for IssueAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueAnalyzer")
            .field("options", &self.options)
            .field("truncate_oversized", &self.truncate_oversized)
            .field("fetcher", &self.fetcher.name())
            .field("completion", &self.completion.as_ref().map(|c| c.name()))
            .finish()
    }
}

impl IssueAnalyzer {
    /// Create a new analyzer builder
    pub fn builder() -> IssueAnalyzerBuilder {
        IssueAnalyzerBuilder::new()
    }

    /// Get analyzer description
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    /// Fetch options in effect
    pub fn fetch_options(&self) -> &FetchOptions {
        &self.options
    }

    /// Get parsed issue schema as JSON
    pub fn output_schema(&self) -> serde_json::Value {
        let schema = schema_for!(ParsedIssue);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Get analysis result schema as JSON
    pub fn analysis_schema(&self) -> serde_json::Value {
        let schema = schema_for!(AnalysisResult);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Fetch and parse an issue page
    pub async fn parse_issue(&self, url: &str) -> Result<ParsedIssue, IssueError> {
        let page = fetch_page_with(url, self.fetcher.as_ref(), &self.options).await?;
        Ok(self.parse_markup(&page.url, &page.body))
    }

    /// Parse already fetched markup
    pub fn parse_markup(&self, url: &str, html: &str) -> ParsedIssue {
        let issue = parse_issue_markup(url, html);
        info!(
            url,
            title = %issue.content.title,
            comments = issue.content.comments.len(),
            "Parsed issue"
        );
        issue
    }

    /// Size metrics of the full prompt rendering
    pub fn assess_size(&self, issue: &ParsedIssue) -> SizeAssessment {
        assess_size(issue)
    }

    /// Strategy this analyzer uses for `issue`
    pub fn prompt_strategy(&self, issue: &ParsedIssue) -> PromptStrategy {
        if !self.truncate_oversized {
            return PromptStrategy::Full;
        }
        let assessment = assess_size(issue);
        PromptStrategy::select(assessment.recommendation, true)
    }

    /// Render the analysis prompt
    pub fn build_prompt(&self, issue: &ParsedIssue) -> String {
        let strategy = self.prompt_strategy(issue);
        debug!(?strategy, "Rendering analysis prompt");
        build_prompt(issue, strategy)
    }

    /// Run the prompt through the completion provider and parse the result
    pub async fn analyze(&self, issue: &ParsedIssue) -> Result<AnalysisResult, IssueError> {
        let provider = self
            .completion
            .as_ref()
            .ok_or(IssueError::NoCompletionProvider)?;

        let prompt = self.build_prompt(issue);
        let text = provider.complete(&prompt).await?;
        if text.trim().is_empty() {
            return Err(IssueError::EmptyCompletion(provider.name()));
        }

        debug!(provider = provider.name(), bytes = text.len(), "Completion received");
        Ok(parse_analysis(&text))
    }

    /// Fetch and parse an issue with status updates
    pub async fn parse_issue_with_status<F>(
        &self,
        url: &str,
        mut status_callback: F,
    ) -> Result<ParsedIssue, IssueError>
    where
        F: FnMut(ToolStatus),
    {
        status_callback(ToolStatus::new("validate").with_percent(0.0));
        validate_url(url)?;

        status_callback(ToolStatus::new("fetch").with_percent(10.0));
        let page = fetch_page_with(url, self.fetcher.as_ref(), &self.options).await?;

        status_callback(
            ToolStatus::new("extract")
                .with_message(format!("{} bytes", page.body.len()))
                .with_percent(70.0),
        );
        let issue = self.parse_markup(&page.url, &page.body);

        status_callback(ToolStatus::new("complete").with_percent(100.0));
        Ok(issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CannedCompletion;
    use crate::types::{IssueContent, Priority};

    fn sample_issue() -> ParsedIssue {
        ParsedIssue {
            url: "https://www.drupal.org/project/eca/issues/1".to_string(),
            content: IssueContent {
                title: "Sample".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_analyzer_builder() {
        let analyzer = IssueAnalyzer::builder()
            .user_agent("TestAgent/1.0")
            .timeout(Duration::from_secs(5))
            .max_body_bytes(1024)
            .accept_host("127.0.0.1")
            .truncate_oversized(true)
            .build();

        let options = analyzer.fetch_options();
        assert_eq!(options.user_agent.as_deref(), Some("TestAgent/1.0"));
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.max_body_bytes, Some(1024));
        assert!(analyzer.truncate_oversized);
        assert_eq!(analyzer.fetcher.name(), "issue_page");
    }

    #[test]
    fn test_analyzer_description() {
        let analyzer = IssueAnalyzer::default();
        assert!(!analyzer.description().is_empty());
        assert!(format!("{:?}", analyzer).contains("issue_page"));
    }

    #[test]
    fn test_analyzer_schemas() {
        let analyzer = IssueAnalyzer::default();
        let output = analyzer.output_schema();
        assert!(output["properties"]["url"].is_object());
        assert!(output["properties"]["metadata"].is_object());
        assert!(output["properties"]["content"].is_object());

        let analysis = analyzer.analysis_schema();
        assert!(analysis["properties"]["technical_summary"].is_object());
        assert!(analysis["properties"]["recommended_priority"].is_object());
    }

    #[test]
    fn test_small_issue_never_truncated() {
        let analyzer = IssueAnalyzer::builder().truncate_oversized(true).build();
        assert_eq!(analyzer.prompt_strategy(&sample_issue()), PromptStrategy::Full);
    }

    #[tokio::test]
    async fn test_analyze_without_provider() {
        let analyzer = IssueAnalyzer::default();
        let result = analyzer.analyze(&sample_issue()).await;
        assert!(matches!(result, Err(IssueError::NoCompletionProvider)));
    }

    #[tokio::test]
    async fn test_analyze_with_canned_completion() {
        let analyzer = IssueAnalyzer::builder()
            .completion_provider(CannedCompletion::new(
                "## TECHNICAL SUMMARY\nA summary.\n## RECOMMENDED PRIORITY\nurgent",
            ))
            .build();
        let result = analyzer.analyze(&sample_issue()).await.unwrap();
        assert_eq!(result.technical_summary, "A summary.");
        assert_eq!(result.recommended_priority, Priority::Urgent);
    }

    #[tokio::test]
    async fn test_analyze_blank_completion() {
        let analyzer = IssueAnalyzer::builder()
            .completion_provider(CannedCompletion::new("  \n "))
            .build();
        let result = analyzer.analyze(&sample_issue()).await;
        assert!(matches!(result, Err(IssueError::EmptyCompletion("canned"))));
    }

    #[tokio::test]
    async fn test_analyze_provider_failure() {
        let analyzer = IssueAnalyzer::builder()
            .completion_provider(CannedCompletion::failing("quota exceeded"))
            .build();
        let result = analyzer.analyze(&sample_issue()).await;
        assert!(matches!(result, Err(IssueError::CompletionFailed { .. })));
    }

    #[tokio::test]
    async fn test_status_stops_at_validate() {
        let analyzer = IssueAnalyzer::default();
        let mut phases = Vec::new();
        let result = analyzer
            .parse_issue_with_status("", |status| phases.push(status.phase))
            .await;
        assert!(matches!(result, Err(IssueError::MissingUrl)));
        assert_eq!(phases, vec!["validate"]);
    }

    #[test]
    fn test_tool_status() {
        let status = ToolStatus::new("fetch")
            .with_message("Fetching issue page")
            .with_percent(50.0);

        assert_eq!(status.phase, "fetch");
        assert_eq!(status.message, Some("Fetching issue page".to_string()));
        assert_eq!(status.percent_complete, Some(50.0));
    }
}
