//! Prompt size estimation
//!
//! Advisory only: the assessment never mutates the issue or blocks
//! processing. Callers use the tier to decide on truncation.

use crate::convert::truncate_chars;
use crate::prompt::{build_prompt, PromptStrategy};
use crate::types::{IssueComment, ParsedIssue, SizeAssessment, SizeRecommendation};

/// Characters per estimated token
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimated tokens at which a prompt counts as large
pub const LARGE_PROMPT_TOKENS: usize = 15_000;

/// Estimated tokens at which a prompt counts as oversized
pub const OVERSIZED_PROMPT_TOKENS: usize = 50_000;

/// Length of the prompt preview in characters
pub const PROMPT_PREVIEW_CHARS: usize = 500;

/// Coarse token estimate: characters / 4, rounded up
pub fn estimate_tokens(prompt_length: usize) -> usize {
    prompt_length.div_ceil(CHARS_PER_TOKEN)
}

impl SizeRecommendation {
    /// Tier for an estimated token count
    pub fn from_tokens(estimated_tokens: usize) -> Self {
        if estimated_tokens >= OVERSIZED_PROMPT_TOKENS {
            SizeRecommendation::Oversized
        } else if estimated_tokens >= LARGE_PROMPT_TOKENS {
            SizeRecommendation::Large
        } else {
            SizeRecommendation::Safe
        }
    }
}

/// Assess the full rendering of an issue's prompt
pub fn assess_size(issue: &ParsedIssue) -> SizeAssessment {
    let prompt = build_prompt(issue, PromptStrategy::Full);
    assess_prompt(&prompt, &issue.content.comments)
}

/// Assess an already rendered prompt against its comment thread
pub fn assess_prompt(prompt: &str, comments: &[IssueComment]) -> SizeAssessment {
    let prompt_length = prompt.chars().count();
    let estimated_tokens = estimate_tokens(prompt_length);
    let comment_count = comments.len();
    let total_comment_length: usize = comments.iter().map(|c| c.body.chars().count()).sum();
    let average_comment_length = if comment_count == 0 {
        0
    } else {
        (total_comment_length + comment_count / 2) / comment_count
    };

    SizeAssessment {
        prompt_length,
        estimated_tokens,
        comment_count,
        total_comment_length,
        average_comment_length,
        recommendation: SizeRecommendation::from_tokens(estimated_tokens),
        prompt_preview: truncate_chars(prompt, PROMPT_PREVIEW_CHARS).to_string(),
    }
}
