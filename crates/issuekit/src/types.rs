//! Core types for IssueKit

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder author for comments kept without a recognizable author
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Issue metadata as shown on the issue page
///
/// Every field is free text; an empty string means the page did not
/// expose the field in any recognizable form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IssueMetadata {
    pub project: String,
    pub version: String,
    pub component: String,
    pub priority: String,
    pub status: String,
    pub category: String,
    pub assigned: String,
    pub reporter: String,
    pub created: String,
    pub updated: String,
}

/// A single comment from the issue thread
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IssueComment {
    /// Identifier, stable within one parse only
    pub id: String,
    pub author: String,
    /// Timestamp as displayed on the page
    pub timestamp: String,
    pub body: String,
    /// Status transition recorded by the comment, as "old → new"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_change: Option<String>,
}

/// Descriptive content of an issue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IssueContent {
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_motivation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_tasks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_interface_changes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_changes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_model_changes: Option<String>,
    /// Comments in page (chronological) order
    pub comments: Vec<IssueComment>,
}

impl IssueContent {
    /// Get a named section by kind
    pub fn section(&self, kind: SectionKind) -> Option<&str> {
        let value = match kind {
            SectionKind::ProblemMotivation => &self.problem_motivation,
            SectionKind::ProposedResolution => &self.proposed_resolution,
            SectionKind::RemainingTasks => &self.remaining_tasks,
            SectionKind::UserInterfaceChanges => &self.user_interface_changes,
            SectionKind::ApiChanges => &self.api_changes,
            SectionKind::DataModelChanges => &self.data_model_changes,
        };
        value.as_deref()
    }

    /// Set a named section by kind
    pub fn set_section(&mut self, kind: SectionKind, text: String) {
        let slot = match kind {
            SectionKind::ProblemMotivation => &mut self.problem_motivation,
            SectionKind::ProposedResolution => &mut self.proposed_resolution,
            SectionKind::RemainingTasks => &mut self.remaining_tasks,
            SectionKind::UserInterfaceChanges => &mut self.user_interface_changes,
            SectionKind::ApiChanges => &mut self.api_changes,
            SectionKind::DataModelChanges => &mut self.data_model_changes,
        };
        *slot = Some(text);
    }
}

/// Named free-text sections of an issue summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    ProblemMotivation,
    ProposedResolution,
    RemainingTasks,
    UserInterfaceChanges,
    ApiChanges,
    DataModelChanges,
}

impl SectionKind {
    /// All section kinds in heading-match priority order
    pub const ALL: [SectionKind; 6] = [
        SectionKind::ProblemMotivation,
        SectionKind::ProposedResolution,
        SectionKind::RemainingTasks,
        SectionKind::UserInterfaceChanges,
        SectionKind::ApiChanges,
        SectionKind::DataModelChanges,
    ];

    /// Lowercase heading phrases that route to this section
    ///
    /// Longer phrases come first so text-pattern matching prefers them.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            SectionKind::ProblemMotivation => &["problem/motivation", "problem", "motivation"],
            SectionKind::ProposedResolution => &["proposed resolution", "proposed", "resolution"],
            SectionKind::RemainingTasks => &["remaining tasks", "remaining", "tasks"],
            SectionKind::UserInterfaceChanges => {
                &["user interface changes", "user interface", "ui changes"]
            }
            SectionKind::ApiChanges => &["api changes"],
            SectionKind::DataModelChanges => &["data model changes", "data model", "database"],
        }
    }

    /// Human-readable label used in prompts and reports
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::ProblemMotivation => "Problem/Motivation",
            SectionKind::ProposedResolution => "Proposed Resolution",
            SectionKind::RemainingTasks => "Remaining Tasks",
            SectionKind::UserInterfaceChanges => "User Interface Changes",
            SectionKind::ApiChanges => "API Changes",
            SectionKind::DataModelChanges => "Data Model Changes",
        }
    }

    /// Classify a heading by substring match against the synonyms
    pub fn from_heading(heading: &str) -> Option<Self> {
        let lower = heading.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.synonyms().iter().any(|s| lower.contains(s)))
    }
}

/// A fully parsed issue page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParsedIssue {
    /// Source URL
    pub url: String,
    pub metadata: IssueMetadata,
    pub content: IssueContent,
}

/// Prompt size tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SizeRecommendation {
    /// Comfortably within a model's context budget
    #[default]
    Safe,
    /// Processable, but large enough to watch for context limits
    Large,
    /// Mega-issue: the full rendering risks exceeding the budget
    Oversized,
}

impl SizeRecommendation {
    /// String form used in JSON and reports
    pub fn as_str(self) -> &'static str {
        match self {
            SizeRecommendation::Safe => "safe",
            SizeRecommendation::Large => "large",
            SizeRecommendation::Oversized => "oversized",
        }
    }
}

impl fmt::Display for SizeRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size metrics for a rendered analysis prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SizeAssessment {
    /// Full prompt length in characters
    pub prompt_length: usize,
    /// Approximate token count (characters / 4, rounded up)
    pub estimated_tokens: usize,
    pub comment_count: usize,
    /// Sum of comment body lengths in characters
    pub total_comment_length: usize,
    /// Mean comment body length in characters
    pub average_comment_length: usize,
    pub recommendation: SizeRecommendation,
    /// First characters of the rendered prompt
    pub prompt_preview: String,
}

/// Recommended priority for an issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// How ready an issue is for a new contributor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Readiness {
    ReadyToContribute,
    #[default]
    NeedsDiscussion,
    ComplexAdvanced,
    Blocked,
}

/// Skill level needed to contribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

/// Vocabulary shared by the enumerated analysis values
pub trait Vocabulary: Sized + Copy + PartialEq + 'static {
    /// Every value with its canonical token
    const TOKENS: &'static [(&'static str, Self)];

    /// Canonical token of this value
    fn as_str(self) -> &'static str {
        Self::TOKENS
            .iter()
            .find(|(_, v)| *v == self)
            .map(|(t, _)| *t)
            .unwrap_or("")
    }

    /// Look up a value by token, ignoring case
    fn from_token(token: &str) -> Option<Self> {
        Self::TOKENS
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(token))
            .map(|(_, v)| *v)
    }
}

macro_rules! vocabulary {
    ($ty:ty, [$(($token:literal, $variant:expr)),+ $(,)?]) => {
        impl Vocabulary for $ty {
            const TOKENS: &'static [(&'static str, Self)] = &[$(($token, $variant)),+];
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(Vocabulary::as_str(*self))
            }
        }
    };
}

vocabulary!(
    Priority,
    [
        ("low", Priority::Low),
        ("medium", Priority::Medium),
        ("high", Priority::High),
        ("urgent", Priority::Urgent),
    ]
);

vocabulary!(
    Readiness,
    [
        ("ready-to-contribute", Readiness::ReadyToContribute),
        ("needs-discussion", Readiness::NeedsDiscussion),
        ("complex-advanced", Readiness::ComplexAdvanced),
        ("blocked", Readiness::Blocked),
    ]
);

vocabulary!(
    Complexity,
    [
        ("beginner", Complexity::Beginner),
        ("intermediate", Complexity::Intermediate),
        ("advanced", Complexity::Advanced),
        ("expert", Complexity::Expert),
    ]
);

/// Structured result decoded from a completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub technical_summary: String,
    /// Ecosystem context: APIs, subsystems, conventions involved
    pub project_context: String,
    pub work_completed: Vec<String>,
    pub remaining_work: Vec<String>,
    pub next_steps: Vec<String>,
    pub related_patterns: Vec<String>,
    pub recommended_priority: Priority,
    pub contribution_readiness: Readiness,
    pub complexity: Complexity,
    pub code_review_needed: bool,
}
