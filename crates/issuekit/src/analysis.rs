//! Completion response parsing
//!
//! Decodes completion text that follows the labelled-section layout
//! requested by the prompt. A single cursor moves only on lines containing
//! a known section label; every other line is routed to the section under
//! the cursor. Missing or malformed sections fall back to defaults, so
//! parsing never fails.

use crate::types::{AnalysisResult, Complexity, Priority, Readiness, Vocabulary};
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    TechnicalSummary,
    ProjectContext,
    WorkCompleted,
    RemainingWork,
    NextSteps,
    RecommendedPriority,
    ContributionReadiness,
    CodeReviewNeeded,
    Complexity,
    RelatedPatterns,
}

/// Section labels, matched as case-sensitive substrings
const SECTION_LABELS: &[(&str, Section)] = &[
    ("TECHNICAL SUMMARY", Section::TechnicalSummary),
    ("TECHNICAL_SUMMARY", Section::TechnicalSummary),
    ("DRUPAL_CONTEXT", Section::ProjectContext),
    ("DRUPAL CONTEXT", Section::ProjectContext),
    ("PROJECT_CONTEXT", Section::ProjectContext),
    ("PROJECT CONTEXT", Section::ProjectContext),
    ("WORK COMPLETED", Section::WorkCompleted),
    ("WORK_COMPLETED", Section::WorkCompleted),
    ("REMAINING WORK", Section::RemainingWork),
    ("REMAINING_WORK", Section::RemainingWork),
    ("ACTIONABLE STEPS", Section::NextSteps),
    ("ACTIONABLE_STEPS", Section::NextSteps),
    ("NEXT STEPS", Section::NextSteps),
    ("NEXT_STEPS", Section::NextSteps),
    ("RECOMMENDED PRIORITY", Section::RecommendedPriority),
    ("RECOMMENDED_PRIORITY", Section::RecommendedPriority),
    ("CONTRIBUTION READINESS", Section::ContributionReadiness),
    ("CONTRIBUTION_READINESS", Section::ContributionReadiness),
    ("CODE REVIEW NEEDED", Section::CodeReviewNeeded),
    ("CODE_REVIEW_NEEDED", Section::CodeReviewNeeded),
    ("COMPLEXITY", Section::Complexity),
    ("RELATED PATTERNS", Section::RelatedPatterns),
    ("RELATED_PATTERNS", Section::RelatedPatterns),
];

/// Build `^[\s*_\[]*(token|…)\b`, allowing markdown emphasis before the token
fn leading_token_regex(tokens: &[&str]) -> Regex {
    let alternatives: Vec<String> = tokens.iter().map(|t| regex::escape(t)).collect();
    let pattern = format!(r"(?i)^[\s*_\[]*({})\b", alternatives.join("|"));
    Regex::new(&pattern).expect("leading token regex")
}

fn vocabulary_regex<V: Vocabulary>() -> Regex {
    let tokens: Vec<&str> = V::TOKENS.iter().map(|(token, _)| *token).collect();
    leading_token_regex(&tokens)
}

static PRIORITY_RE: LazyLock<Regex> = LazyLock::new(vocabulary_regex::<Priority>);
static READINESS_RE: LazyLock<Regex> = LazyLock::new(vocabulary_regex::<Readiness>);
static COMPLEXITY_RE: LazyLock<Regex> = LazyLock::new(vocabulary_regex::<Complexity>);
static BOOL_RE: LazyLock<Regex> =
    LazyLock::new(|| leading_token_regex(&["true", "yes", "false", "no"]));

fn leading_token<V: Vocabulary>(re: &Regex, line: &str) -> Option<V> {
    let token = re.captures(line)?.get(1)?;
    V::from_token(token.as_str())
}

fn leading_bool(line: &str) -> Option<bool> {
    let token = BOOL_RE.captures(line)?.get(1)?;
    let token = token.as_str().to_ascii_lowercase();
    Some(token == "true" || token == "yes")
}

fn section_for(line: &str) -> Option<Section> {
    SECTION_LABELS
        .iter()
        .find(|(label, _)| line.contains(label))
        .map(|(_, section)| *section)
}

fn append_text(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(line);
}

/// Parse completion text into an [`AnalysisResult`]
pub fn parse_analysis(text: &str) -> AnalysisResult {
    let mut result = AnalysisResult::default();
    let mut priority: Option<Priority> = None;
    let mut readiness: Option<Readiness> = None;
    let mut complexity: Option<Complexity> = None;
    let mut review: Option<bool> = None;
    let mut cursor: Option<Section> = None;

    for line in text.lines().map(str::trim) {
        if let Some(section) = section_for(line) {
            cursor = Some(section);
            continue;
        }
        let Some(section) = cursor else {
            continue;
        };
        if line.is_empty() {
            continue;
        }

        let item = line.strip_prefix("- ").map(str::trim);
        // Free-text sections take prose only
        let prose = item.is_none() && !line.starts_with('#');
        match section {
            Section::TechnicalSummary if prose => append_text(&mut result.technical_summary, line),
            Section::ProjectContext if prose => append_text(&mut result.project_context, line),
            Section::WorkCompleted => result.work_completed.extend(item.map(String::from)),
            Section::RemainingWork => result.remaining_work.extend(item.map(String::from)),
            Section::NextSteps => result.next_steps.extend(item.map(String::from)),
            Section::RelatedPatterns => result.related_patterns.extend(item.map(String::from)),
            Section::RecommendedPriority if priority.is_none() => {
                priority = leading_token(&PRIORITY_RE, item.unwrap_or(line));
            }
            Section::ContributionReadiness if readiness.is_none() => {
                readiness = leading_token(&READINESS_RE, item.unwrap_or(line));
            }
            Section::Complexity if complexity.is_none() => {
                complexity = leading_token(&COMPLEXITY_RE, item.unwrap_or(line));
            }
            Section::CodeReviewNeeded if review.is_none() => {
                review = leading_bool(item.unwrap_or(line));
            }
            _ => {}
        }
    }

    result.recommended_priority = priority.unwrap_or_default();
    result.contribution_readiness = readiness.unwrap_or_default();
    result.complexity = complexity.unwrap_or_default();
    result.code_review_needed = review.unwrap_or(false);
    result
}
