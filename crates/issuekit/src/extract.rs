//! Field extraction
//!
//! Recovers issue metadata and descriptive content from page markup.
//! Every field has an ordered list of strategies and the first non-empty
//! result wins:
//!
//! 1. structured selectors against the DOM (`.field--name-…` containers,
//!    labelled `time` elements, headings followed by a block)
//! 2. text patterns against the flattened page text, for pages where the
//!    fields are rendered as one concatenated block
//!
//! Nothing in here fails. A field no strategy can recover is left empty.

use crate::comments::{extract_comments, inside_comment, is_comment_container, COMMENT_MARKER_RE};
use crate::convert::{collapse_whitespace, element_to_text, element_to_text_filtered};
use crate::types::{IssueContent, IssueMetadata, ParsedIssue, SectionKind};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

/// How far past the first label the metadata block may extend
const METADATA_WINDOW_BYTES: usize = 2000;

/// How far before `Project:` a leading `Status:` label may sit
const STATUS_LOOKBEHIND_BYTES: usize = 500;

/// Headings longer than this are prose, not section headings
const MAX_HEADING_CHARS: usize = 60;

/// A parsed page: the DOM plus its flattened text
pub struct IssuePage {
    document: Html,
    text: String,
    /// Flattened text with comment containers pruned
    description: String,
}

impl IssuePage {
    /// Parse markup once for all extraction strategies
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let text = element_to_text(document.root_element());
        let description =
            element_to_text_filtered(document.root_element(), |el| !is_comment_container(el));
        Self {
            document,
            text,
            description,
        }
    }

    /// Root element for selector queries
    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// Flattened, line-structured page text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Page text before the comment thread starts
    fn text_before_comments(&self) -> &str {
        match COMMENT_MARKER_RE.find(&self.description) {
            Some(m) => &self.description[..m.start()],
            None => &self.description,
        }
    }
}

/// Extract a [`ParsedIssue`] from raw markup
pub fn parse_issue_markup(url: &str, html: &str) -> ParsedIssue {
    let page = IssuePage::parse(html);
    ParsedIssue {
        url: url.to_string(),
        metadata: extract_metadata(&page),
        content: extract_content(&page),
    }
}

// ---------------------------------------------------------------------------
// Selector helpers

/// Parse a selector, skipping invalid ones
pub(crate) fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Whitespace-collapsed text of an element
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&element_to_text(el))
}

/// First non-empty element text across selectors, in priority order
pub(crate) fn first_text(scope: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| {
        let sel = selector(css)?;
        scope
            .select(&sel)
            .map(element_text)
            .find(|text| !text.is_empty())
    })
}

/// First non-empty attribute value across selectors, in priority order
fn first_attr(scope: ElementRef<'_>, selectors: &[&str], attr: &str) -> Option<String> {
    selectors.iter().find_map(|css| {
        let sel = selector(css)?;
        scope
            .select(&sel)
            .filter_map(|el| el.value().attr(attr))
            .map(collapse_whitespace)
            .find(|value| !value.is_empty())
    })
}

fn previous_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.prev_siblings().find_map(ElementRef::wrap)
}

fn next_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// Clamp a byte index down to the nearest char boundary
fn char_boundary(s: &str, mut idx: usize) -> usize {
    idx = idx.min(s.len());
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

// ---------------------------------------------------------------------------
// Metadata

/// Metadata fields in the order the tracker renders them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetadataField {
    Status,
    Project,
    Version,
    Component,
    Priority,
    Category,
    Assigned,
    Reporter,
    Created,
    Updated,
}

impl MetadataField {
    fn from_label(label: &str) -> Option<Self> {
        let field = match label {
            "Status" => MetadataField::Status,
            "Project" => MetadataField::Project,
            "Version" => MetadataField::Version,
            "Component" => MetadataField::Component,
            "Priority" => MetadataField::Priority,
            "Category" => MetadataField::Category,
            "Assigned" => MetadataField::Assigned,
            "Reporter" => MetadataField::Reporter,
            "Created" => MetadataField::Created,
            "Updated" => MetadataField::Updated,
            _ => return None,
        };
        Some(field)
    }

    /// Structured selectors, in priority order
    fn selectors(self) -> &'static [&'static str] {
        match self {
            MetadataField::Status => &[".field--name-field-issue-status .field__item"],
            MetadataField::Project => &[
                ".field--name-field-project .field__item a",
                ".field--name-field-project .field__item",
            ],
            MetadataField::Version => &[".field--name-field-issue-version .field__item"],
            MetadataField::Component => &[".field--name-field-issue-component .field__item"],
            MetadataField::Priority => &[".field--name-field-issue-priority .field__item"],
            MetadataField::Category => &[".field--name-field-issue-category .field__item"],
            MetadataField::Assigned => &[
                ".field--name-field-issue-assigned .field__item a",
                ".field--name-field-issue-assigned .field__item",
            ],
            MetadataField::Reporter => &[
                ".field--name-uid .field__item a",
                ".field--name-uid .field__item",
            ],
            MetadataField::Created | MetadataField::Updated => &[],
        }
    }

    /// Label words marking a `time` element as this field
    fn time_keywords(self) -> &'static [&'static str] {
        match self {
            MetadataField::Created => &["created", "submitted"],
            MetadataField::Updated => &["updated", "changed"],
            _ => &[],
        }
    }
}

static METADATA_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(Status|Project|Version|Component|Priority|Category|Assigned|Reporter|Created|Updated):",
    )
    .expect("metadata label regex")
});

/// Extract metadata, preferring structured containers over text patterns
pub fn extract_metadata(page: &IssuePage) -> IssueMetadata {
    let from_text = text_metadata(page.text());
    let mut metadata = IssueMetadata::default();

    let fields = [
        (MetadataField::Status, &mut metadata.status),
        (MetadataField::Project, &mut metadata.project),
        (MetadataField::Version, &mut metadata.version),
        (MetadataField::Component, &mut metadata.component),
        (MetadataField::Priority, &mut metadata.priority),
        (MetadataField::Category, &mut metadata.category),
        (MetadataField::Assigned, &mut metadata.assigned),
        (MetadataField::Reporter, &mut metadata.reporter),
        (MetadataField::Created, &mut metadata.created),
        (MetadataField::Updated, &mut metadata.updated),
    ];

    for (field, slot) in fields {
        let value = structured_metadata(page, field).or_else(|| {
            let value = from_text.get(field)?;
            debug!(?field, "Metadata field recovered from text pattern");
            Some(value.to_string())
        });
        *slot = value.unwrap_or_default();
    }

    metadata
}

/// Structured-selector strategy for one field
fn structured_metadata(page: &IssuePage, field: MetadataField) -> Option<String> {
    let keywords = field.time_keywords();
    if keywords.is_empty() {
        first_text(page.root(), field.selectors())
    } else {
        labelled_time(page.root(), keywords)
    }
}

/// Text of the first `time[datetime]` whose label mentions a keyword
///
/// The label is the preceding sibling element, or the parent's text when
/// the time element has no preceding sibling.
fn labelled_time(scope: ElementRef<'_>, keywords: &[&str]) -> Option<String> {
    let sel = selector("time[datetime]")?;
    scope.select(&sel).find_map(|time| {
        let label = match previous_element(time) {
            Some(prev) => element_text(prev),
            None => time
                .parent()
                .and_then(ElementRef::wrap)
                .map(element_text)
                .unwrap_or_default(),
        }
        .to_lowercase();

        if !keywords.iter().any(|k| label.contains(k)) {
            return None;
        }

        let text = element_text(time);
        if text.is_empty() {
            time.value().attr("datetime").map(str::to_string)
        } else {
            Some(text)
        }
    })
}

/// Metadata values recovered from the flattened text, keyed by field
#[derive(Debug, Default)]
struct TextMetadata {
    values: Vec<(MetadataField, String)>,
}

impl TextMetadata {
    fn get(&self, field: MetadataField) -> Option<&str> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    fn insert(&mut self, field: MetadataField, value: String) {
        if value.is_empty() || self.get(field).is_some() {
            return;
        }
        self.values.push((field, value));
    }
}

/// Text-pattern strategy: tokenize label positions, then slice between them
///
/// All label occurrences inside the metadata block are located first and
/// each value runs from its label to the next label found, whatever that
/// label is. A reordered or missing field therefore never bleeds into its
/// neighbour. The last label's value runs to the end of its line.
fn text_metadata(text: &str) -> TextMetadata {
    let mut result = TextMetadata::default();
    let Some((start, end)) = metadata_window(text) else {
        return result;
    };
    let window = &text[start..end];

    let labels: Vec<_> = METADATA_LABEL_RE.captures_iter(window).collect();
    for (i, caps) in labels.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(field) = MetadataField::from_label(name.as_str()) else {
            continue;
        };
        let value_end = labels
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(window.len());
        result.insert(field, clean_value(&window[whole.end()..value_end]));
    }

    result
}

/// Locate the metadata block in the flattened text
///
/// Anchored on the first `Project:` label (or the first `Status:` when the
/// page has no project label), pulled back to a closely preceding
/// `Status:`, and ended at the comment thread or a size cap.
fn metadata_window(text: &str) -> Option<(usize, usize)> {
    let labels: Vec<(&str, usize)> = METADATA_LABEL_RE
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(0)?.start())))
        .collect();

    let anchor = labels
        .iter()
        .find(|(name, _)| *name == "Project")
        .or_else(|| labels.iter().find(|(name, _)| *name == "Status"))?
        .1;

    let lookbehind = char_boundary(text, anchor.saturating_sub(STATUS_LOOKBEHIND_BYTES));
    let start = METADATA_LABEL_RE
        .captures_iter(&text[lookbehind..anchor])
        .filter(|caps| caps.get(1).is_some_and(|m| m.as_str() == "Status"))
        .filter_map(|caps| caps.get(0))
        .last()
        .map(|m| lookbehind + m.start())
        .unwrap_or(anchor);

    let mut end = char_boundary(text, start + METADATA_WINDOW_BYTES);
    if let Some(m) = COMMENT_MARKER_RE.find(&text[start..end]) {
        end = start + m.start();
    }

    Some((start, end))
}

/// First non-empty line of a slice, whitespace-collapsed
fn clean_value(raw: &str) -> String {
    raw.lines()
        .map(|line| collapse_whitespace(line.trim_matches(|c: char| c == '|' || c.is_whitespace())))
        .find(|line| !line.is_empty())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Content

const TITLE_SELECTORS: &[&str] = &["h1.page-title", "h1#page-title", ".issue-title", "h1"];

const SUMMARY_SELECTORS: &[&str] = &[".field--name-body .field__item", ".field--name-body"];

static SECTION_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Multi-word phrases may lead an inline paragraph; single words must
    // stand alone on their line to count as a heading.
    let mut inline = Vec::new();
    let mut alone = Vec::new();
    for kind in SectionKind::ALL {
        for synonym in kind.synonyms() {
            let escaped = regex::escape(synonym);
            if synonym.contains([' ', '/']) {
                inline.push(escaped);
            } else {
                alone.push(escaped);
            }
        }
    }
    let pattern = format!(
        r"(?im)^[ \t]*(?:(?:{})[ \t]*:?|(?:{})[ \t]*:?[ \t]*$)",
        inline.join("|"),
        alone.join("|")
    );
    Regex::new(&pattern).expect("section heading regex")
});

/// Extract title, summary, sections and comments
pub fn extract_content(page: &IssuePage) -> IssueContent {
    let mut content = IssueContent {
        title: extract_title(page),
        summary: extract_summary(page),
        ..Default::default()
    };

    let text_sections = text_sections(page.text_before_comments());
    for kind in SectionKind::ALL {
        let value = structured_section(page.root(), kind).or_else(|| {
            text_sections
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, v)| v.clone())
        });
        if let Some(value) = value {
            content.set_section(kind, value);
        }
    }

    content.comments = extract_comments(page);
    content
}

/// Title from candidate selectors, then the document `<title>`
fn extract_title(page: &IssuePage) -> String {
    first_text(page.root(), TITLE_SELECTORS)
        .or_else(|| {
            let title = first_text(page.root(), &["title"])?;
            // "Issue title | Project | Site" keeps only the first segment
            let head = title.split(" | ").next().unwrap_or(&title).trim();
            Some(head.to_string())
        })
        .unwrap_or_default()
}

/// Summary from the body field, then page description metadata
fn extract_summary(page: &IssuePage) -> String {
    first_text(page.root(), SUMMARY_SELECTORS)
        .or_else(|| {
            first_attr(
                page.root(),
                &[
                    "meta[name=\"description\"]",
                    "meta[property=\"og:description\"]",
                ],
                "content",
            )
        })
        .unwrap_or_default()
}

/// Structured strategy: a heading followed by its block, outside the comment thread
fn structured_section(scope: ElementRef<'_>, kind: SectionKind) -> Option<String> {
    let sel = selector("h2, h3, h4")?;
    scope.select(&sel).find_map(|heading| {
        if inside_comment(heading) {
            return None;
        }
        let heading_text = element_text(heading);
        if heading_text.chars().count() > MAX_HEADING_CHARS
            || SectionKind::from_heading(&heading_text) != Some(kind)
        {
            return None;
        }
        let block = next_element(heading)?;
        let text = element_to_text(block);
        (!text.is_empty()).then_some(text)
    })
}

/// Text strategy: heading phrase up to the next heading or a blank line
fn text_sections(text: &str) -> Vec<(SectionKind, String)> {
    let headings: Vec<_> = SECTION_HEADING_RE.find_iter(text).collect();
    let mut sections: Vec<(SectionKind, String)> = Vec::new();

    for (i, heading) in headings.iter().enumerate() {
        let Some(kind) = SectionKind::from_heading(heading.as_str()) else {
            continue;
        };
        if sections.iter().any(|(k, _)| *k == kind) {
            continue;
        }

        let end = headings
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(text.len());
        let body = text[heading.end()..end].trim_start();
        let body = body.split("\n\n").next().unwrap_or("").trim();
        if !body.is_empty() {
            sections.push((kind, body.to_string()));
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTURED: &str = r#"<!DOCTYPE html>
<html>
<head><title>Entity access default result | ECA | Drupal.org</title></head>
<body>
  <h1 class="page-title">Allow a default access result</h1>
  <div class="field field--name-field-project"><div class="field__item"><a href="/project/eca">ECA</a></div></div>
  <div class="field field--name-field-issue-version"><div class="field__item">2.1.x-dev</div></div>
  <div class="field field--name-field-issue-component"><div class="field__item">Code</div></div>
  <div class="field field--name-field-issue-priority"><div class="field__item">Normal</div></div>
  <div class="field field--name-field-issue-status"><div class="field__item">Needs review</div></div>
  <div class="field field--name-uid"><div class="field__item"><a href="/u/jdoe">jdoe</a></div></div>
  <div class="submitted"><span>Created</span><time datetime="2025-08-01T10:17:00Z">1 August 2025 at 10:17</time></div>
  <div class="changed"><span>Updated</span><time datetime="2025-08-05T12:01:00Z">5 August 2025 at 12:01</time></div>
  <div class="field field--name-body"><div class="field__item">
    <h3>Problem/Motivation</h3>
    <p>Access results set earlier cannot be overridden.</p>
    <h3>Proposed resolution</h3>
    <p>Add a configurable default.</p>
    <h3>Remaining tasks</h3>
    <ul><li>Tests</li><li>Docs</li></ul>
  </div></div>
</body>
</html>"#;

    const FLATTENED: &str = r#"<html><body>
<div class="issue">Status: Active Project: Drupal core Version: 11.x-dev Component: entity system Priority: Major Category: Bug report Assigned: Unassigned Reporter: alice Created: 3 March 2024 at 09:00 UTC Updated: 4 March 2024 at 18:30 UTC</div>
<div>Problem/Motivation</div>
<div>Saving an entity twice loses the revision log.</div>
<div></div>
<div>Proposed resolution</div>
<div>Copy the log before the second save.</div>
<div>Comment #1 bob</div>
<div>Remaining tasks</div>
<div>This line belongs to a comment.</div>
</body></html>"#;

    #[test]
    fn test_structured_metadata() {
        let page = IssuePage::parse(STRUCTURED);
        let metadata = extract_metadata(&page);
        assert_eq!(metadata.project, "ECA");
        assert_eq!(metadata.version, "2.1.x-dev");
        assert_eq!(metadata.component, "Code");
        assert_eq!(metadata.priority, "Normal");
        assert_eq!(metadata.status, "Needs review");
        assert_eq!(metadata.reporter, "jdoe");
        assert_eq!(metadata.created, "1 August 2025 at 10:17");
        assert_eq!(metadata.updated, "5 August 2025 at 12:01");
        assert_eq!(metadata.category, "");
    }

    #[test]
    fn test_text_metadata() {
        let page = IssuePage::parse(FLATTENED);
        let metadata = extract_metadata(&page);
        assert_eq!(metadata.status, "Active");
        assert_eq!(metadata.project, "Drupal core");
        assert_eq!(metadata.version, "11.x-dev");
        assert_eq!(metadata.component, "entity system");
        assert_eq!(metadata.priority, "Major");
        assert_eq!(metadata.category, "Bug report");
        assert_eq!(metadata.assigned, "Unassigned");
        assert_eq!(metadata.reporter, "alice");
        assert_eq!(metadata.created, "3 March 2024 at 09:00 UTC");
        assert_eq!(metadata.updated, "4 March 2024 at 18:30 UTC");
    }

    #[test]
    fn test_text_metadata_without_updated_runs_to_line_end() {
        let text = "Status: Fixed Project: Token Reporter: carol Created: 2 May 2023\nThanks for the report.";
        let metadata = text_metadata(text);
        assert_eq!(metadata.get(MetadataField::Created), Some("2 May 2023"));
        assert_eq!(metadata.get(MetadataField::Updated), None);
    }

    #[test]
    fn test_text_metadata_reordered_fields_do_not_bleed() {
        let text = "Project: Views Status: Postponed Priority: Minor Component: UI";
        let metadata = text_metadata(text);
        assert_eq!(metadata.get(MetadataField::Project), Some("Views"));
        assert_eq!(metadata.get(MetadataField::Status), Some("Postponed"));
        assert_eq!(metadata.get(MetadataField::Priority), Some("Minor"));
        assert_eq!(metadata.get(MetadataField::Component), Some("UI"));
        assert_eq!(metadata.get(MetadataField::Version), None);
    }

    #[test]
    fn test_text_metadata_labels_on_separate_lines() {
        let text = "Status:\nNeeds work\nProject:\nPathauto\nVersion:\n8.x-1.x-dev";
        let metadata = text_metadata(text);
        assert_eq!(metadata.get(MetadataField::Status), Some("Needs work"));
        assert_eq!(metadata.get(MetadataField::Project), Some("Pathauto"));
        assert_eq!(metadata.get(MetadataField::Version), Some("8.x-1.x-dev"));
    }

    #[test]
    fn test_text_metadata_ignores_comment_status_labels() {
        let text = "Project: Webform Status: Active\nComment #1 dave\nStatus: Active » Fixed";
        let metadata = text_metadata(text);
        assert_eq!(metadata.get(MetadataField::Status), Some("Active"));
    }

    #[test]
    fn test_text_metadata_absent() {
        assert!(text_metadata("Nothing labelled here").values.is_empty());
    }

    #[test]
    fn test_title_priority() {
        let page = IssuePage::parse(STRUCTURED);
        assert_eq!(extract_title(&page), "Allow a default access result");

        let page = IssuePage::parse(
            "<html><head><title>Broken pager | Views | Drupal.org</title></head><body><h1> </h1></body></html>",
        );
        assert_eq!(extract_title(&page), "Broken pager");

        let page = IssuePage::parse("<html><body><p>no title</p></body></html>");
        assert_eq!(extract_title(&page), "");
    }

    #[test]
    fn test_summary_fallback_to_meta_description() {
        let page = IssuePage::parse(
            r#"<html><head><meta name="description" content="Short   summary."></head><body></body></html>"#,
        );
        assert_eq!(extract_summary(&page), "Short summary.");
    }

    #[test]
    fn test_structured_sections() {
        let page = IssuePage::parse(STRUCTURED);
        let content = extract_content(&page);
        assert_eq!(
            content.problem_motivation.as_deref(),
            Some("Access results set earlier cannot be overridden.")
        );
        assert_eq!(
            content.proposed_resolution.as_deref(),
            Some("Add a configurable default.")
        );
        let tasks = content.remaining_tasks.unwrap();
        assert!(tasks.contains("Tests"));
        assert!(tasks.contains("Docs"));
        assert!(content.api_changes.is_none());
        assert!(content.summary.starts_with("Problem/Motivation"));
    }

    #[test]
    fn test_text_sections() {
        let page = IssuePage::parse(FLATTENED);
        let content = extract_content(&page);
        assert_eq!(
            content.problem_motivation.as_deref(),
            Some("Saving an entity twice loses the revision log.")
        );
        assert_eq!(
            content.proposed_resolution.as_deref(),
            Some("Copy the log before the second save.")
        );
        // Headings inside the comment thread are not issue sections
        assert!(content.remaining_tasks.is_none());
    }

    #[test]
    fn test_comment_headings_are_not_sections() {
        let html = r#"<html><body>
          <div class="field field--name-body"><div class="field__item">
            <h3>Problem/Motivation</h3>
            <p>Saving the form drops the weight.</p>
          </div></div>
          <section class="comments">
            <article class="comment" id="comment-9">
              <div class="comment__content">
                <h3>API changes</h3>
                <p>I think we should rename everything.</p>
              </div>
            </article>
          </section>
        </body></html>"#;

        let content = extract_content(&IssuePage::parse(html));
        assert_eq!(
            content.problem_motivation.as_deref(),
            Some("Saving the form drops the weight.")
        );
        assert!(content.api_changes.is_none());
        assert_eq!(content.comments.len(), 1);
    }

    #[test]
    fn test_comment_mention_does_not_end_description() {
        let html = r#"<html><body>
<div>Problem/Motivation</div>
<div>See Comment #3 in the parent issue for the stack trace.</div>
<div></div>
<div>Proposed resolution</div>
<div>Guard the loader against a missing bundle.</div>
</body></html>"#;

        let content = extract_content(&IssuePage::parse(html));
        assert_eq!(
            content.problem_motivation.as_deref(),
            Some("See Comment #3 in the parent issue for the stack trace.")
        );
        assert_eq!(
            content.proposed_resolution.as_deref(),
            Some("Guard the loader against a missing bundle.")
        );
        assert!(content.comments.is_empty());
    }

    #[test]
    fn test_text_sections_inline_and_synonyms() {
        let text = "Motivation\nUsers are confused.\n\nMore prose.\nAPI changes: none expected\nDatabase\nNew column.";
        let sections = text_sections(text);
        assert_eq!(
            sections,
            vec![
                (SectionKind::ProblemMotivation, "Users are confused.".to_string()),
                (SectionKind::ApiChanges, "none expected".to_string()),
                (SectionKind::DataModelChanges, "New column.".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_word_prose_is_not_a_heading() {
        let sections = text_sections("Problem occurs on save.\nTasks are queued.");
        assert!(sections.is_empty());
    }

    #[test]
    fn test_parse_issue_markup() {
        let issue = parse_issue_markup("https://www.drupal.org/project/eca/issues/1", STRUCTURED);
        assert_eq!(issue.url, "https://www.drupal.org/project/eca/issues/1");
        assert_eq!(issue.metadata.status, "Needs review");
        assert_eq!(issue.content.title, "Allow a default access result");
        assert!(issue.content.comments.is_empty());
    }

    #[test]
    fn test_empty_markup_degrades() {
        let issue = parse_issue_markup("u", "");
        assert_eq!(issue.metadata, IssueMetadata::default());
        assert_eq!(issue.content.title, "");
        assert!(issue.content.comments.is_empty());
    }
}
