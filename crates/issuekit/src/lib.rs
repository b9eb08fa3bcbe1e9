//! IssueKit - issue page extraction and LLM analysis prompts
//!
//! This crate fetches a public issue-tracker page, extracts a structured
//! [`ParsedIssue`] (metadata, descriptive sections, comment thread), renders
//! an analysis prompt sized for a language model, and decodes the model's
//! labelled-section completion back into an [`AnalysisResult`].
//!
//! ## Pipeline
//!
//! URL → [`Fetcher`] → markup → [`extract`] + [`comments`] → [`ParsedIssue`]
//! → [`size`] → [`prompt`] → [`CompletionProvider`] → [`analysis`] →
//! [`AnalysisResult`]
//!
//! Only the fetch and the completion call can fail. Extraction and response
//! parsing always succeed, degrading to empty fields and documented defaults
//! when the page or the completion does not have the expected shape.
//!
//! ## Example
//!
//! ```no_run
//! use issuekit::IssueAnalyzer;
//!
//! # async fn run() -> Result<(), issuekit::IssueError> {
//! let analyzer = IssueAnalyzer::builder().truncate_oversized(true).build();
//! let issue = analyzer
//!     .parse_issue("https://www.drupal.org/project/eca/issues/3539583")
//!     .await?;
//! let size = analyzer.assess_size(&issue);
//! println!("{} comments, ~{} tokens", size.comment_count, size.estimated_tokens);
//! println!("{}", analyzer.build_prompt(&issue));
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod client;
pub mod comments;
mod completion;
mod convert;
mod error;
pub mod extract;
pub mod fetchers;
pub mod prompt;
pub mod size;
mod tool;
mod types;

pub use analysis::parse_analysis;
pub use client::{fetch_page, fetch_page_with, parse_issue, FetchOptions};
pub use completion::{CannedCompletion, CompletionProvider};
pub use convert::html_to_text;
pub use error::IssueError;
pub use extract::parse_issue_markup;
pub use fetchers::{FetchedPage, Fetcher, IssuePageFetcher};
pub use prompt::{build_prompt, PromptStrategy};
pub use size::{assess_size, estimate_tokens};
pub use tool::{IssueAnalyzer, IssueAnalyzerBuilder, ToolStatus};
pub use types::{
    AnalysisResult, Complexity, IssueComment, IssueContent, IssueMetadata, ParsedIssue,
    Priority, Readiness, SectionKind, SizeAssessment, SizeRecommendation, Vocabulary,
    ANONYMOUS_AUTHOR,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "IssueKit Analyzer/1.0";

/// Analyzer description for LLM consumption
pub const TOOL_DESCRIPTION: &str = r#"Fetches an issue page and prepares it for language-model analysis.

- Extracts metadata, summary sections and the full comment thread
- Estimates prompt size and flags oversized issues
- Renders an analysis prompt, truncating the thread when oversized
- Parses labelled-section completions into a structured result"#;
