//! Comment thread extraction
//!
//! Comments are split into blocks first, either from structural containers
//! or from the recurring `Comment #N` marker in the flattened page text.
//! Each block then goes through field recovery: author, timestamp, body and
//! status transition, each with its own strategy chain.

use crate::convert::{collapse_whitespace, element_to_text, truncate_chars};
use crate::extract::{first_text, selector, IssuePage};
use crate::types::{IssueComment, ANONYMOUS_AUTHOR};
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;
use tracing::debug;

/// Longest body produced by line reconstruction
pub const MAX_RECONSTRUCTED_BODY_CHARS: usize = 500;

/// Lines shorter than this are dropped during reconstruction
const MIN_LINE_CHARS: usize = 3;

/// A comment without an author needs a body longer than this to be kept
const MIN_ANONYMOUS_BODY_CHARS: usize = 10;

/// Authors longer than this are prose, not user names
const MAX_AUTHOR_CHARS: usize = 60;

const CONTAINER_SELECTORS: &[&str] = &[".comment", "article.comment", "[id^=\"comment-\"]"];

const AUTHOR_SELECTORS: &[&str] = &[
    ".comment__author a",
    ".comment__author",
    "a.username",
    ".username",
    "[typeof=\"schema:Person\"]",
    ".comment-author a",
];

const TIME_SELECTORS: &[&str] = &[".comment__time time", "time", ".submitted"];

const BODY_SELECTORS: &[&str] = &[
    ".comment__content .field--name-comment-body .field__item",
    ".field--name-comment-body",
    ".comment__content",
    ".comment-body",
];

/// Drupal issue statuses, as rendered in status transitions
const STATUS_VALUE: &str = r"(?i:Active|Needs work|Needs review|Reviewed & tested by the community|RTBC|Fixed|Postponed(?:[ \t]*\([^)\n]*\))?|Closed(?:[ \t]*\([^)\n]*\))?|Patch \(to be ported\))";

/// The `Comment #N` index marker, only where it opens a line
pub(crate) static COMMENT_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Comment\s*#(\d+)").expect("comment marker regex")
});

static AUTHOR_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*Comment\s*#\d+[ \t]+(\S[^\n]*?)[ \t]*(?:\s(?:Credit attribution|commented|Created|Updated|Status:)|\s\d{1,2}\s+[A-Za-z]{3,9}\.?,?\s+\d{4}|$)",
    )
    .expect("author line regex")
});

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b\d{1,2}\s+(?i:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.?,?\s+\d{4}(?:\s+at\s+\d{1,2}:\d{2}(?:\s*[aApP][mM])?(?:[ \t]+[A-Z]{2,5}\b)?)?",
    )
    .expect("timestamp regex")
});

static STATUS_CHANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"Status:\s*({STATUS_VALUE})\s*»\s*({STATUS_VALUE})"))
        .expect("status change regex")
});

static BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^comment\s*#\d+|^status:$|credit attribution|\bcommented\b|log\s*in or register|login or register|to post comments|issue fork|jump to comment|^(?:reply|quote|permalink)$",
    )
    .expect("boilerplate regex")
});

/// True if the element is a comment container
pub(crate) fn is_comment_container(el: ElementRef<'_>) -> bool {
    let value = el.value();
    value.classes().any(|class| class == "comment")
        || value.attr("id").is_some_and(|id| id.starts_with("comment-"))
}

/// True if the element sits inside a comment container
pub(crate) fn inside_comment(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(is_comment_container)
}

/// One comment's worth of page, before field recovery
pub(crate) struct CommentBlock<'a> {
    id: String,
    text: String,
    element: Option<ElementRef<'a>>,
}

/// Extract the comment thread in page order
pub fn extract_comments(page: &IssuePage) -> Vec<IssueComment> {
    let mut blocks = structured_blocks(page.root());
    if blocks.is_empty() {
        blocks = text_blocks(page.text());
        debug!(blocks = blocks.len(), "No comment containers, split page text on markers");
    }

    let comments: Vec<IssueComment> = blocks.iter().filter_map(recover_comment).collect();
    debug!(blocks = blocks.len(), kept = comments.len(), "Extracted comments");
    comments
}

/// Blocks from the first container selector that matches anything
///
/// Containers nested inside an already matched container are skipped so a
/// comment never appears twice.
fn structured_blocks(root: ElementRef<'_>) -> Vec<CommentBlock<'_>> {
    for css in CONTAINER_SELECTORS {
        let Some(sel) = selector(css) else {
            continue;
        };

        let mut matched: Vec<ElementRef<'_>> = Vec::new();
        for el in root.select(&sel) {
            let nested = el
                .ancestors()
                .any(|ancestor| matched.iter().any(|m| m.id() == ancestor.id()));
            if !nested {
                matched.push(el);
            }
        }

        if !matched.is_empty() {
            return matched
                .into_iter()
                .enumerate()
                .map(|(i, el)| CommentBlock {
                    id: el
                        .value()
                        .attr("id")
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("comment-{}", i + 1)),
                    text: element_to_text(el),
                    element: Some(el),
                })
                .collect();
        }
    }

    Vec::new()
}

/// Blocks from the flattened text, one per distinct `Comment #N`
fn text_blocks(text: &str) -> Vec<CommentBlock<'static>> {
    let markers: Vec<(&str, usize)> = COMMENT_MARKER_RE
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(0)?.start())))
        .collect();

    let mut blocks: Vec<CommentBlock<'static>> = Vec::new();
    for (i, (number, start)) in markers.iter().enumerate() {
        let end = markers.get(i + 1).map(|(_, s)| *s).unwrap_or(text.len());
        let chunk = text[*start..end].trim();
        let id = format!("comment-{number}");

        match blocks.iter_mut().find(|block| block.id == id) {
            Some(block) => {
                block.text.push('\n');
                block.text.push_str(chunk);
            }
            None => blocks.push(CommentBlock {
                id,
                text: chunk.to_string(),
                element: None,
            }),
        }
    }

    blocks
}

/// Recover one comment, or `None` if the block carries nothing useful
fn recover_comment(block: &CommentBlock<'_>) -> Option<IssueComment> {
    let author = recover_author(block);
    let timestamp = recover_timestamp(block);
    let status = status_transition(&block.text);
    let body = recover_body(block, &author);

    if author.is_empty() && body.chars().count() <= MIN_ANONYMOUS_BODY_CHARS {
        return None;
    }

    Some(IssueComment {
        id: block.id.clone(),
        author: if author.is_empty() {
            ANONYMOUS_AUTHOR.to_string()
        } else {
            author
        },
        timestamp,
        body,
        status_change: status.map(|s| s.render()),
    })
}

fn recover_author(block: &CommentBlock<'_>) -> String {
    AUTHOR_LINE_RE
        .captures_iter(&block.text)
        .filter_map(|caps| caps.get(1))
        .map(|m| collapse_whitespace(m.as_str()))
        .find(|name| plausible_author(name))
        .or_else(|| block.element.and_then(|el| first_text(el, AUTHOR_SELECTORS)))
        .unwrap_or_default()
}

fn plausible_author(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_AUTHOR_CHARS
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

fn recover_timestamp(block: &CommentBlock<'_>) -> String {
    if let Some(m) = TIMESTAMP_RE.find(&block.text) {
        return collapse_whitespace(m.as_str());
    }

    block
        .element
        .and_then(|el| {
            TIME_SELECTORS.iter().find_map(|css| {
                let sel = selector(css)?;
                let time = el.select(&sel).next()?;
                let text = collapse_whitespace(&element_to_text(time));
                if text.is_empty() {
                    time.value().attr("datetime").map(str::to_string)
                } else {
                    Some(text)
                }
            })
        })
        .unwrap_or_default()
}

fn recover_body(block: &CommentBlock<'_>, author: &str) -> String {
    let from_selectors = block.element.and_then(|el| {
        BODY_SELECTORS.iter().find_map(|css| {
            let sel = selector(css)?;
            el.select(&sel)
                .map(element_to_text)
                .find(|text| !text.is_empty())
        })
    });

    from_selectors.unwrap_or_else(|| reconstruct_body(&block.text, author))
}

/// Rebuild a body from block lines, dropping page chrome
///
/// Status transitions are cut out of the text first, so prose sharing a
/// line with one survives.
fn reconstruct_body(text: &str, author: &str) -> String {
    let text = STATUS_CHANGE_RE.replace_all(text, "\n");
    let mut body = String::new();

    for line in text.lines().map(str::trim) {
        if line.chars().count() < MIN_LINE_CHARS
            || BOILERPLATE_RE.is_match(line)
            || (!author.is_empty() && line == author)
            || is_timestamp_line(line)
        {
            continue;
        }

        if !body.is_empty() {
            body.push(' ');
        }
        body.push_str(line);

        if body.chars().count() > MAX_RECONSTRUCTED_BODY_CHARS {
            body = truncate_chars(&body, MAX_RECONSTRUCTED_BODY_CHARS).to_string();
            break;
        }
    }

    body
}

/// True if the line is a date with at most a few characters around it
fn is_timestamp_line(line: &str) -> bool {
    TIMESTAMP_RE.is_match(line) && TIMESTAMP_RE.replace_all(line, "").trim().chars().count() < 5
}

/// A `Status: old » new` transition
#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusChange {
    from: String,
    to: String,
}

impl StatusChange {
    fn render(&self) -> String {
        format!("{} → {}", self.from, self.to)
    }
}

fn status_transition(text: &str) -> Option<StatusChange> {
    let caps = STATUS_CHANGE_RE.captures(text)?;
    let from = caps.get(1)?.as_str().trim();
    let to = caps.get(2)?.as_str().trim();
    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some(StatusChange {
        from: from.to_string(),
        to: to.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comments(html: &str) -> Vec<IssueComment> {
        extract_comments(&IssuePage::parse(html))
    }

    #[test]
    fn test_structured_comment() {
        let html = r#"<html><body>
          <section class="comments">
            <article class="comment" id="comment-15000001">
              <div class="comment__meta">
                <span class="comment__author"><a href="/u/mxh">mxh</a></span>
                <span class="comment__time"><time datetime="2025-08-02T09:00:00Z">2 August 2025 at 09:00</time></span>
              </div>
              <div class="comment__content">
                <div class="field--name-comment-body"><div class="field__item"><p>Patch attached, please review.</p></div></div>
              </div>
            </article>
          </section>
        </body></html>"#;

        let comments = comments(html);
        assert_eq!(comments.len(), 1);
        let comment = &comments[0];
        assert_eq!(comment.id, "comment-15000001");
        assert_eq!(comment.author, "mxh");
        assert_eq!(comment.timestamp, "2 August 2025 at 09:00");
        assert_eq!(comment.body, "Patch attached, please review.");
        assert_eq!(comment.status_change, None);
    }

    #[test]
    fn test_structured_status_change() {
        let html = r#"<div class="comment">
            <a class="username">jdoe</a>
            <table class="nodechanges"><tr><td>Status:</td><td>Active</td><td>&raquo; Needs review</td></tr></table>
            <div class="comment__content">Ready for another look now.</div>
        </div>"#;

        let comments = comments(html);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, "jdoe");
        assert_eq!(comments[0].status_change.as_deref(), Some("Active → Needs review"));
        assert_eq!(comments[0].body, "Ready for another look now.");
    }

    #[test]
    fn test_nested_containers_counted_once() {
        let html = r#"<div class="comment" id="comment-1">
            <span class="username">outer</span>
            <div class="comment__content">Outer comment body text.</div>
            <div class="comment" id="comment-2"><span class="username">inner</span></div>
        </div>"#;
        let comments = comments(html);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, "comment-1");
    }

    #[test]
    fn test_anonymous_retention_threshold() {
        let dropped = r#"<div class="comment"><div class="comment__content">0123456789</div></div>"#;
        assert!(comments(dropped).is_empty());

        let kept = r#"<div class="comment"><div class="comment__content">0123456789a</div></div>"#;
        let comments = comments(kept);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, ANONYMOUS_AUTHOR);
        assert_eq!(comments[0].body, "0123456789a");
        assert_eq!(comments[0].id, "comment-1");
    }

    #[test]
    fn test_text_split_fallback() {
        let html = r#"<html><body>
<div>Status: Active Project: Views</div>
<div>Comment #1 alice Credit attribution: alice commented</div>
<div>3 March 2024 at 10:00 UTC</div>
<div>I can reproduce this on a clean install.</div>
<div>Comment #2 bob</div>
<div>4 March 2024 at 11:15 UTC</div>
<div>Status: Active » Needs review</div>
<div>Here is a patch that fixes the pager.</div>
<div>Log in or register to post comments</div>
</body></html>"#;

        let comments = comments(html);
        assert_eq!(comments.len(), 2);

        assert_eq!(comments[0].id, "comment-1");
        assert_eq!(comments[0].author, "alice");
        assert_eq!(comments[0].timestamp, "3 March 2024 at 10:00 UTC");
        assert_eq!(comments[0].body, "I can reproduce this on a clean install.");

        assert_eq!(comments[1].author, "bob");
        assert_eq!(comments[1].status_change.as_deref(), Some("Active → Needs review"));
        assert_eq!(comments[1].body, "Here is a patch that fixes the pager.");
    }

    #[test]
    fn test_text_split_decodes_entities() {
        let html = "<div>Comment #1 bob</div><div>It&rsquo;s broken for &ldquo;caf&eacute;&rdquo; users.</div>";

        let comments = comments(html);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, "bob");
        assert_eq!(comments[0].body, "It’s broken for “café” users.");
    }

    #[test]
    fn test_inline_comment_reference_is_not_a_marker() {
        let html = r#"<html><body>
<div>Comment #1 alice</div>
<div>The search query is not escaped.</div>
<div>Comment #2 carol</div>
<div>As noted in Comment #1 above, the query needs quoting; new patch attached.</div>
</body></html>"#;

        let comments = comments(html);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "The search query is not escaped.");
        assert_eq!(comments[1].author, "carol");
        assert_eq!(
            comments[1].body,
            "As noted in Comment #1 above, the query needs quoting; new patch attached."
        );
    }

    #[test]
    fn test_status_transition_sharing_a_line_with_prose() {
        let blocks = text_blocks(
            "Comment #2 carol\nStatus: Active » Needs review Attached a patch that fixes it.",
        );
        let comment = recover_comment(&blocks[0]).unwrap();
        assert_eq!(comment.author, "carol");
        assert_eq!(comment.status_change.as_deref(), Some("Active → Needs review"));
        assert_eq!(comment.body, "Attached a patch that fixes it.");
    }

    #[test]
    fn test_status_values_with_qualifiers() {
        let status =
            status_transition("Status: Needs review » Closed (fixed) thanks all").unwrap();
        assert_eq!(status.render(), "Needs review → Closed (fixed)");

        let status =
            status_transition("Status: Reviewed & tested by the community » Fixed").unwrap();
        assert_eq!(status.render(), "Reviewed & tested by the community → Fixed");

        assert!(status_transition("Status: see » below").is_none());
    }

    #[test]
    fn test_duplicate_markers_merge() {
        let text = "Comment #3\nComment #3 carol\nFirst half of the text.\nComment #4 dave\nAnother comment here.";
        let blocks = text_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].id, "comment-3");
        assert_eq!(recover_author(&blocks[0]), "carol");
    }

    #[test]
    fn test_author_must_share_marker_line() {
        let blocks = text_blocks("Comment #1\n0123456789");
        assert_eq!(blocks.len(), 1);
        assert_eq!(recover_author(&blocks[0]), "");
        assert!(recover_comment(&blocks[0]).is_none());
    }

    #[test]
    fn test_date_is_not_an_author() {
        let blocks = text_blocks("Comment #7 12 May 2024 at 10:00\nBody text that is long enough.");
        let comment = recover_comment(&blocks[0]).unwrap();
        assert_eq!(comment.author, ANONYMOUS_AUTHOR);
        assert_eq!(comment.timestamp, "12 May 2024 at 10:00");
        assert_eq!(comment.body, "Body text that is long enough.");
    }

    #[test]
    fn test_reconstructed_body_cap() {
        let long_line = "word ".repeat(200);
        let body = reconstruct_body(&long_line, "");
        assert_eq!(body.chars().count(), MAX_RECONSTRUCTED_BODY_CHARS);
    }

    #[test]
    fn test_reconstruction_drops_short_and_chrome_lines() {
        let text = "Comment #2 erin\nerin\nok\nIssue fork eca-123\nReal content line.\nQuote\nMore content.";
        let body = reconstruct_body(text, "erin");
        assert_eq!(body, "Real content line. More content.");
    }

    #[test]
    fn test_status_transition_across_lines() {
        let status = status_transition("Status:\nNeeds work\n»\nNeeds review").unwrap();
        assert_eq!(status.render(), "Needs work → Needs review");
        assert!(status_transition("Status: Active").is_none());
    }

    #[test]
    fn test_timestamp_line_detection() {
        assert!(is_timestamp_line("3 March 2024 at 10:00 UTC"));
        assert!(is_timestamp_line("5 Sept. 2023"));
        assert!(!is_timestamp_line("Fixed in the 3 March 2024 release of the module"));
    }
}
