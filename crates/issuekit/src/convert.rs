//! HTML flattening utilities
//!
//! The text-pattern extraction strategies work on a line-structured
//! plain-text rendering of the parsed document: block elements start new
//! lines, non-content elements are dropped, and runs of whitespace collapse.
//! Entities arrive already decoded from the HTML parser.

use scraper::{ElementRef, Html, Node};

/// Elements whose content never contributes text
const SKIP_TAGS: &[&str] = &[
    "head", "title", "script", "style", "noscript", "iframe", "svg", "template", "button",
];

/// Elements that open and close a line
const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "section",
    "article",
    "aside",
    "header",
    "footer",
    "main",
    "nav",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "dl",
    "dt",
    "dd",
    "table",
    "tr",
    "td",
    "th",
    "blockquote",
    "pre",
    "hr",
];

/// Elements that terminate a paragraph, leaving a blank line behind
const PARAGRAPH_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "table", "blockquote", "pre",
];

/// Inline elements that still need a word boundary
const SPACED_TAGS: &[&str] = &["span", "a", "time", "strong", "em", "label"];

/// Flatten an HTML fragment into line-structured plain text
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    element_to_text(fragment.root_element())
}

/// Flatten the content of an already-parsed element
pub fn element_to_text(el: ElementRef<'_>) -> String {
    element_to_text_filtered(el, |_| true)
}

/// Flatten the content of an element, pruning descendants `keep` rejects
pub fn element_to_text_filtered<F>(el: ElementRef<'_>, keep: F) -> String
where
    F: Fn(ElementRef<'_>) -> bool,
{
    let mut output = String::new();
    push_children(el, &keep, &mut output);
    clean_whitespace(&output)
}

fn push_children(el: ElementRef<'_>, keep: &dyn Fn(ElementRef<'_>) -> bool, output: &mut String) {
    for child in el.children() {
        match child.value() {
            // Source formatting, newlines included, reads as a single space
            Node::Text(text) => {
                output.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_element(child, keep, output);
                }
            }
            _ => {}
        }
    }
}

fn push_element(el: ElementRef<'_>, keep: &dyn Fn(ElementRef<'_>) -> bool, output: &mut String) {
    let name = el.value().name();
    if SKIP_TAGS.contains(&name) || !keep(el) {
        return;
    }
    if name == "br" {
        output.push('\n');
        return;
    }

    let block = BLOCK_TAGS.contains(&name);
    let spaced = SPACED_TAGS.contains(&name);
    if block {
        output.push('\n');
    } else if spaced {
        output.push(' ');
    }

    push_children(el, keep, output);

    if block {
        output.push('\n');
        if PARAGRAPH_TAGS.contains(&name) {
            output.push('\n');
        }
    } else if spaced {
        output.push(' ');
    }
}

/// Clean whitespace: collapse runs, trim lines, keep at most one blank line
pub fn clean_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_space = false;
    let mut newline_count = 0;

    for c in s.chars() {
        if c == '\n' {
            if result.ends_with(' ') {
                result.pop();
            }
            newline_count += 1;
            last_was_space = true;
            if newline_count <= 2 {
                result.push(c);
            }
        } else if c.is_whitespace() {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            newline_count = 0;
            last_was_space = false;
            result.push(c);
        }
    }

    result.trim().to_string()
}

/// Collapse all whitespace, including newlines, into single spaces
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters on a char boundary
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_elements_become_lines() {
        let html = "<div><h3>Problem/Motivation</h3><p>Access is denied.</p></div>";
        let text = html_to_text(html);
        assert_eq!(text, "Problem/Motivation\n\nAccess is denied.");
    }

    #[test]
    fn test_inline_elements_keep_words_apart() {
        let html = "<span>Status:</span><span>Active</span> <a href=\"/u/x\">jdoe</a>";
        let text = html_to_text(html);
        assert_eq!(text, "Status: Active jdoe");
    }

    #[test]
    fn test_skip_non_content() {
        let html = "<head><title>T</title></head><p>Before</p><script>alert('bad');</script><style>p{}</style><p>After</p>";
        let text = html_to_text(html);
        assert!(text.contains("Before"));
        assert!(text.contains("After"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("p{}"));
        assert!(!text.contains('T'));
    }

    #[test]
    fn test_script_with_angle_brackets() {
        let html = "<p>Before</p><script>if (a<b && b>c) { x(); }</script><p>After</p>";
        let text = html_to_text(html);
        assert_eq!(text, "Before\n\nAfter");
    }

    #[test]
    fn test_header_is_not_head() {
        let html = "<header><p>Site name</p></header><p>Body</p>";
        let text = html_to_text(html);
        assert!(text.contains("Site name"));
    }

    #[test]
    fn test_entity_decoding() {
        let html = "<p>Active &raquo; Needs review &amp; &lt;b&gt; &#8594; &#x41; &nbsp;done</p>";
        let text = html_to_text(html);
        assert_eq!(text, "Active » Needs review & <b> → A done");
    }

    #[test]
    fn test_named_typography_entities() {
        let html = "<p>It&rsquo;s broken for &ldquo;caf&eacute;&rdquo; users&hellip;</p>";
        let text = html_to_text(html);
        assert_eq!(text, "It’s broken for “café” users…");
    }

    #[test]
    fn test_source_newlines_are_spaces() {
        let html = "<div>Comment #1\n   mxh\n</div><div>Body<br>next line</div>";
        assert_eq!(html_to_text(html), "Comment #1 mxh\nBody\nnext line");
    }

    #[test]
    fn test_filtered_flattening() {
        let fragment = Html::parse_fragment(
            r#"<div class="summary">Kept text</div><div class="comment">Dropped text</div>"#,
        );
        let text = element_to_text_filtered(fragment.root_element(), |el| {
            !el.value().classes().any(|c| c == "comment")
        });
        assert_eq!(text, "Kept text");
    }

    #[test]
    fn test_bare_ampersand_survives() {
        let text = html_to_text("<p>Tom & Jerry; Rock &roll</p>");
        assert_eq!(text, "Tom & Jerry; Rock &roll");
    }

    #[test]
    fn test_clean_whitespace() {
        let input = "  hello   world  \n\n\n\n  test  ";
        assert_eq!(clean_whitespace(input), "hello world\n\ntest");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\tc "), "a b c");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
