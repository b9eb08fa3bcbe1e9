//! Example: Fetch issue pages and report prompt sizes
//!
//! Run with: cargo run -p issuekit --example size_report
//!
//! This example parses a few public issues and prints what the analyzer
//! would send to a language model for each of them.

use issuekit::{IssueAnalyzer, ParsedIssue, PromptStrategy, SizeAssessment};

/// Report case definition
struct ReportCase {
    url: &'static str,
    description: &'static str,
    expect_title: bool,
}

const REPORT_CASES: &[ReportCase] = &[
    ReportCase {
        url: "https://www.drupal.org/project/eca/issues/3539583",
        description: "Contrib issue with a short thread",
        expect_title: true,
    },
    ReportCase {
        url: "https://www.drupal.org/project/drupal/issues/2350939",
        description: "Core issue with a long discussion",
        expect_title: true,
    },
    ReportCase {
        url: "https://www.drupal.org/project/drupal",
        description: "Project page (rejected, not an issue)",
        expect_title: false,
    },
];

#[tokio::main]
async fn main() {
    println!("IssueKit Size Report");
    println!("====================\n");

    let analyzer = IssueAnalyzer::builder().truncate_oversized(true).build();
    let mut passed = 0;
    let mut failed = 0;

    for (i, case) in REPORT_CASES.iter().enumerate() {
        println!("{}. {}", i + 1, case.description);
        println!("   URL: {}", case.url);

        match analyzer.parse_issue(case.url).await {
            Ok(issue) => {
                let size = analyzer.assess_size(&issue);
                print_report(&issue, &size, analyzer.prompt_strategy(&issue));

                if case.expect_title && !issue.content.title.is_empty() {
                    println!("   ✓ PASS\n");
                    passed += 1;
                } else {
                    println!("   ✗ FAIL (no title extracted)\n");
                    failed += 1;
                }
            }
            Err(e) if !case.expect_title => {
                println!("   Rejected: {}", e);
                println!("   ✓ PASS\n");
                passed += 1;
            }
            Err(e) => {
                println!("   Error: {}", e);
                println!("   ✗ FAIL\n");
                failed += 1;
            }
        }
    }

    println!("====================");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn print_report(issue: &ParsedIssue, size: &SizeAssessment, strategy: PromptStrategy) {
    println!("   Title: {}", issue.content.title);
    println!("   Status: {}", issue.metadata.status);
    println!(
        "   Comments: {} (avg {} chars)",
        size.comment_count, size.average_comment_length
    );
    println!(
        "   Prompt: {} chars, ~{} tokens, {:?}",
        size.prompt_length, size.estimated_tokens, size.recommendation
    );
    if strategy == PromptStrategy::Truncated {
        println!("   Thread will be truncated for analysis");
    }

    let preview = size
        .prompt_preview
        .chars()
        .take(100)
        .collect::<String>()
        .replace('\n', " ");
    println!("   Preview: {}...", preview);
}
