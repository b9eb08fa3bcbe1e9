//! Analysis prompt rendering
//!
//! Renders a [`ParsedIssue`] into a single analysis request: issue context,
//! descriptive sections, the comment thread, and the instructions the
//! downstream consumer must follow, ending with the exact output layout
//! understood by [`crate::analysis::parse_analysis`].

use crate::convert::{collapse_whitespace, truncate_chars};
use crate::types::{IssueComment, ParsedIssue, SectionKind, SizeRecommendation};

/// Comment preview length in the full rendering
pub const FULL_PREVIEW_CHARS: usize = 300;

/// Comment preview length in the truncated rendering
pub const TRUNCATED_PREVIEW_CHARS: usize = 200;

/// Comments kept from the start of the thread when truncating
pub const KEEP_FIRST_COMMENTS: usize = 3;

/// Comments kept from the end of the thread when truncating
pub const KEEP_LAST_COMMENTS: usize = 10;

/// Threads at or below this length are never truncated
pub const TRUNCATION_MIN_COMMENTS: usize = 15;

const NOT_SPECIFIED: &str = "Not specified";

/// Comment rendering strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptStrategy {
    /// Every comment, long previews
    #[default]
    Full,
    /// Thread head and tail around an elision marker, short previews
    Truncated,
}

impl PromptStrategy {
    /// Truncate only when requested and the issue is oversized
    pub fn select(recommendation: SizeRecommendation, truncate_requested: bool) -> Self {
        if truncate_requested && recommendation == SizeRecommendation::Oversized {
            PromptStrategy::Truncated
        } else {
            PromptStrategy::Full
        }
    }

    fn preview_chars(self) -> usize {
        match self {
            PromptStrategy::Full => FULL_PREVIEW_CHARS,
            PromptStrategy::Truncated => TRUNCATED_PREVIEW_CHARS,
        }
    }
}

/// One rendered line of the comment thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentEntry<'a> {
    /// A real comment with its 1-based position in the thread
    Comment {
        number: usize,
        comment: &'a IssueComment,
    },
    /// Synthetic marker standing in for an elided span
    Elided {
        first: usize,
        last: usize,
        count: usize,
    },
}

/// Pick the thread entries a strategy renders
pub fn select_comments(
    comments: &[IssueComment],
    strategy: PromptStrategy,
) -> Vec<CommentEntry<'_>> {
    fn numbered((i, comment): (usize, &IssueComment)) -> CommentEntry<'_> {
        CommentEntry::Comment {
            number: i + 1,
            comment,
        }
    }

    if strategy == PromptStrategy::Full || comments.len() <= TRUNCATION_MIN_COMMENTS {
        return comments.iter().enumerate().map(numbered).collect();
    }

    let tail_start = comments.len() - KEEP_LAST_COMMENTS;
    let mut entries: Vec<CommentEntry<'_>> = comments[..KEEP_FIRST_COMMENTS]
        .iter()
        .enumerate()
        .map(numbered)
        .collect();
    entries.push(CommentEntry::Elided {
        first: KEEP_FIRST_COMMENTS + 1,
        last: tail_start,
        count: tail_start - KEEP_FIRST_COMMENTS,
    });
    entries.extend(
        comments[tail_start..]
            .iter()
            .enumerate()
            .map(|(i, comment)| numbered((tail_start + i, comment))),
    );
    entries
}

/// Render the analysis prompt
pub fn build_prompt(issue: &ParsedIssue, strategy: PromptStrategy) -> String {
    let metadata = &issue.metadata;
    let content = &issue.content;
    let comment_count = content.comments.len();
    let entries = select_comments(&content.comments, strategy);

    let mut prompt = String::with_capacity(4096 + comment_count * 320);

    prompt.push_str(
        "You are an experienced Drupal developer analyzing an issue so that an AI coding \
         assistant can help a developer contribute to it. Provide a structured, actionable \
         analysis.\n\n",
    );

    prompt.push_str("**Issue Context:**\n");
    for (label, value) in [
        ("Title", content.title.as_str()),
        ("URL", issue.url.as_str()),
        ("Project", metadata.project.as_str()),
        ("Version", metadata.version.as_str()),
        ("Component", metadata.component.as_str()),
        ("Status", metadata.status.as_str()),
        ("Priority", metadata.priority.as_str()),
        ("Category", metadata.category.as_str()),
        ("Assigned", metadata.assigned.as_str()),
        ("Reporter", metadata.reporter.as_str()),
        ("Created", metadata.created.as_str()),
        ("Updated", metadata.updated.as_str()),
    ] {
        prompt.push_str(&format!("- {}: {}\n", label, or_not_specified(value)));
    }
    prompt.push_str(&format!("- Comments: {}\n\n", comment_count));

    prompt.push_str(&format!(
        "**Summary:**\n{}\n\n",
        or_not_specified(&content.summary)
    ));
    for kind in SectionKind::ALL {
        let text = match (kind, content.section(kind)) {
            (_, Some(text)) => text,
            // Issues without a structured summary describe the problem in the body
            (SectionKind::ProblemMotivation, None) => content.summary.as_str(),
            (_, None) => "",
        };
        prompt.push_str(&format!(
            "**{}:**\n{}\n\n",
            kind.label(),
            or_not_specified(text)
        ));
    }

    if strategy == PromptStrategy::Truncated && comment_count > TRUNCATION_MIN_COMMENTS {
        prompt.push_str(&format!(
            "**Comments ({} total, showing the first {} and the latest {}):**\n",
            comment_count, KEEP_FIRST_COMMENTS, KEEP_LAST_COMMENTS
        ));
    } else {
        prompt.push_str(&format!("**All Comments ({} total):**\n", comment_count));
    }
    for entry in &entries {
        prompt.push_str(&render_entry(entry, strategy.preview_chars()));
        prompt.push('\n');
    }
    prompt.push('\n');

    if comment_count > TRUNCATION_MIN_COMMENTS {
        prompt.push_str(&format!(
            "This issue has {} comments. For a discussion this long, focus on key technical \
             decisions and consensus points, the most recent status changes and current \
             blockers, recurring reviewer concerns, and how the proposed solution evolved.\n\n",
            comment_count
        ));
    }

    prompt.push_str(INSTRUCTIONS);
    prompt
}

fn or_not_specified(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}

/// Render one thread line: `#<n> <author> (<timestamp>): <preview>[ [Status: …]]`
fn render_entry(entry: &CommentEntry<'_>, preview_chars: usize) -> String {
    match entry {
        CommentEntry::Comment { number, comment } => {
            let body = collapse_whitespace(&comment.body);
            let mut line = format!(
                "#{} {} ({}): {}",
                number,
                comment.author,
                comment.timestamp,
                truncate_chars(&body, preview_chars)
            );
            if let Some(status) = &comment.status_change {
                line.push_str(&format!(" [Status: {}]", status));
            }
            line
        }
        CommentEntry::Elided { first, last, count } => format!(
            "[... {} comments omitted (#{} to #{}) to keep this prompt within the context \
             budget; the opening comments frame the problem and the latest comments reflect \
             the current consensus ...]",
            count, first, last
        ),
    }
}

const INSTRUCTIONS: &str = "\
**Status Glossary:**
- Active: work has not started or the approach is still open
- Needs work: code or a proposal exists but a review found problems to fix
- Needs review: code exists and is waiting for review
- Reviewed & tested by the community (RTBC): reviewed and ready for a maintainer to commit
- Fixed: committed; the issue closes automatically after two weeks
- Postponed: waiting on another issue or on more information
- Closed (duplicate, won't fix, works as designed, outdated, cannot reproduce): no further work planned

**Code Existence Heuristics:**
- Needs review, RTBC and Fixed imply that a merge request or patch exists
- Mentions of merge requests (MR !123), issue forks, or attached .patch/.diff files indicate code
- Needs work after a review means code exists but changes were requested
- Active with no merge request or patch mentioned usually means no code yet
- Do not claim code exists unless the comments or status support it

**Constraints:**
- Base the analysis only on the content above
- Do not fetch URLs, clone repositories, or access any external resource
- If information is missing, say so instead of guessing

Provide the analysis in this EXACT format:

## TECHNICAL_SUMMARY
[2-3 sentences explaining the technical problem and the current solution approach]

## DRUPAL_CONTEXT
[APIs involved, coding standards considerations, architectural patterns, related core or contrib modules]

## WORK_COMPLETED
- [Completed task based on comments and status changes, including code submissions and reviews]

## REMAINING_WORK
- [Specific technical task that still needs to be done]

## NEXT_STEPS
- [Specific actionable step for a developer, most important first, at most 4 steps]

## RECOMMENDED_PRIORITY
[One of: low | medium | high | urgent] - [brief justification]

## CONTRIBUTION_READINESS
[One of: ready-to-contribute | needs-discussion | complex-advanced | blocked] ([brief justification])

## CODE_REVIEW_NEEDED
[true | false] - does this issue have code that needs review?

## COMPLEXITY
[One of: beginner | intermediate | advanced | expert] - skill level needed to contribute

## RELATED_PATTERNS
- [Drupal pattern or API this relates to, e.g. Entity API, Access system, Migration API]
";
