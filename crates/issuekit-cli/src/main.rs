//! IssueKit CLI - Command-line interface for issue extraction and analysis prompts

use clap::{Parser, Subcommand, ValueEnum};
use issuekit::{
    parse_analysis, AnalysisResult, IssueAnalyzer, IssueError, ParsedIssue, SizeAssessment,
    SizeRecommendation, Vocabulary,
};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Output format for report subcommands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Readable markdown report
    #[default]
    Md,
    /// JSON format
    Json,
}

/// IssueKit - issue page extraction and LLM analysis prompts
#[derive(Parser, Debug)]
#[command(name = "issuekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print the JSON Schemas of the parsed issue and the analysis result
    #[arg(long)]
    schema: bool,

    /// Custom User-Agent
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch an issue and print the extracted metadata, sections and comments
    Show {
        /// Issue URL
        url: String,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,
    },
    /// Estimate the analysis prompt size of an issue
    Size {
        /// Issue URL
        url: String,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,
    },
    /// Print the analysis prompt for an issue
    Prompt {
        /// Issue URL
        url: String,

        /// Truncate the comment thread when the issue is oversized
        #[arg(long)]
        truncate: bool,
    },
    /// Parse a completion produced elsewhere (file or stdin)
    ParseResponse {
        /// Completion file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.schema {
        let analyzer = IssueAnalyzer::default();
        let schemas = serde_json::json!({
            "parsed_issue": analyzer.output_schema(),
            "analysis_result": analyzer.analysis_schema(),
        });
        print_json(&schemas);
        std::process::exit(0);
    }

    let user_agent = cli.user_agent.as_deref();
    let result = match cli.command {
        Some(Commands::Show { url, output }) => {
            let analyzer = analyzer_from(user_agent, cli.timeout_secs, false);
            run_show(&analyzer, &url, output).await
        }
        Some(Commands::Size { url, output }) => {
            let analyzer = analyzer_from(user_agent, cli.timeout_secs, false);
            run_size(&analyzer, &url, output).await
        }
        Some(Commands::Prompt { url, truncate }) => {
            let analyzer = analyzer_from(user_agent, cli.timeout_secs, truncate);
            run_prompt(&analyzer, &url).await
        }
        Some(Commands::ParseResponse { file, output }) => run_parse_response(file, output),
        None => {
            eprintln!("Usage: issuekit show <URL>");
            eprintln!("   or: issuekit size <URL>");
            eprintln!("   or: issuekit prompt <URL> [--truncate]");
            eprintln!("   or: issuekit parse-response [FILE]");
            eprintln!("   or: issuekit --help");
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn analyzer_from(
    user_agent: Option<&str>,
    timeout_secs: Option<u64>,
    truncate: bool,
) -> IssueAnalyzer {
    let mut builder = IssueAnalyzer::builder().truncate_oversized(truncate);

    if let Some(ua) = user_agent {
        builder = builder.user_agent(ua);
    }
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

async fn run_show(
    analyzer: &IssueAnalyzer,
    url: &str,
    output: OutputFormat,
) -> Result<(), IssueError> {
    let issue = analyzer.parse_issue(url).await?;
    match output {
        OutputFormat::Md => writeln_safe(&format_issue(&issue)),
        OutputFormat::Json => print_json(&issue),
    }
    Ok(())
}

async fn run_size(
    analyzer: &IssueAnalyzer,
    url: &str,
    output: OutputFormat,
) -> Result<(), IssueError> {
    let issue = analyzer.parse_issue(url).await?;
    let size = analyzer.assess_size(&issue);
    match output {
        OutputFormat::Md => writeln_safe(&format_size(&size)),
        OutputFormat::Json => print_json(&size),
    }
    if let Some(warning) = size_warning(&size) {
        eprintln!("{}", warning);
    }
    Ok(())
}

async fn run_prompt(analyzer: &IssueAnalyzer, url: &str) -> Result<(), IssueError> {
    let issue = analyzer.parse_issue(url).await?;
    if let Some(warning) = size_warning(&analyzer.assess_size(&issue)) {
        eprintln!("{}", warning);
    }
    writeln_safe(&analyzer.build_prompt(&issue));
    Ok(())
}

fn run_parse_response(file: Option<PathBuf>, output: OutputFormat) -> Result<(), IssueError> {
    let text = read_input(file.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: could not read completion: {}", e);
        std::process::exit(1);
    });

    let analysis = parse_analysis(&text);
    match output {
        OutputFormat::Md => writeln_safe(&format_analysis(&analysis)),
        OutputFormat::Json => print_json(&analysis),
    }
    Ok(())
}

/// Read a file, or stdin when no path is given
fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        std::process::exit(1);
    });
    writeln_safe(&json);
}

/// Warning for prompts that may not fit a model's context
fn size_warning(size: &SizeAssessment) -> Option<String> {
    match size.recommendation {
        SizeRecommendation::Safe => None,
        SizeRecommendation::Large => Some(format!(
            "Warning: large prompt (~{} tokens); analysis may be slow or costly",
            size.estimated_tokens
        )),
        SizeRecommendation::Oversized => Some(format!(
            "Warning: oversized prompt (~{} tokens); use `issuekit prompt --truncate`",
            size.estimated_tokens
        )),
    }
}

/// Format a parsed issue as a markdown report with YAML frontmatter
fn format_issue(issue: &ParsedIssue) -> String {
    let metadata = &issue.metadata;
    let content = &issue.content;
    let mut output = String::new();

    output.push_str("---\n");
    output.push_str(&format!("url: {}\n", issue.url));
    for (key, value) in [
        ("project", &metadata.project),
        ("version", &metadata.version),
        ("component", &metadata.component),
        ("status", &metadata.status),
        ("priority", &metadata.priority),
        ("category", &metadata.category),
        ("assigned", &metadata.assigned),
        ("reporter", &metadata.reporter),
        ("created", &metadata.created),
        ("updated", &metadata.updated),
    ] {
        if !value.is_empty() {
            output.push_str(&format!("{}: {}\n", key, value));
        }
    }
    output.push_str(&format!("comments: {}\n", content.comments.len()));
    output.push_str("---\n");

    output.push_str(&format!("# {}\n", content.title));
    if !content.summary.is_empty() {
        output.push_str(&format!("\n{}\n", content.summary));
    }
    for kind in issuekit::SectionKind::ALL {
        if let Some(text) = content.section(kind) {
            output.push_str(&format!("\n## {}\n\n{}\n", kind.label(), text));
        }
    }

    if !content.comments.is_empty() {
        output.push_str("\n## Comments\n");
    }
    for (i, comment) in content.comments.iter().enumerate() {
        output.push_str(&format!("\n### #{} {}", i + 1, comment.author));
        if !comment.timestamp.is_empty() {
            output.push_str(&format!(" ({})", comment.timestamp));
        }
        output.push('\n');
        if let Some(ref status) = comment.status_change {
            output.push_str(&format!("\nStatus: {}\n", status));
        }
        output.push_str(&format!("\n{}\n", comment.body));
    }

    output
}

fn format_size(size: &SizeAssessment) -> String {
    format!(
        "prompt_length: {}\n\
         estimated_tokens: {}\n\
         comment_count: {}\n\
         total_comment_length: {}\n\
         average_comment_length: {}\n\
         recommendation: {}\n\
         \n\
         {}",
        size.prompt_length,
        size.estimated_tokens,
        size.comment_count,
        size.total_comment_length,
        size.average_comment_length,
        size.recommendation.as_str(),
        size.prompt_preview
    )
}

fn format_analysis(analysis: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str("---\n");
    output.push_str(&format!(
        "recommended_priority: {}\n",
        analysis.recommended_priority.as_str()
    ));
    output.push_str(&format!(
        "contribution_readiness: {}\n",
        analysis.contribution_readiness.as_str()
    ));
    output.push_str(&format!("complexity: {}\n", analysis.complexity.as_str()));
    output.push_str(&format!(
        "code_review_needed: {}\n",
        analysis.code_review_needed
    ));
    output.push_str("---\n");

    for (heading, text) in [
        ("Technical Summary", &analysis.technical_summary),
        ("Project Context", &analysis.project_context),
    ] {
        if !text.is_empty() {
            output.push_str(&format!("\n## {}\n\n{}\n", heading, text));
        }
    }
    for (heading, items) in [
        ("Work Completed", &analysis.work_completed),
        ("Remaining Work", &analysis.remaining_work),
        ("Next Steps", &analysis.next_steps),
        ("Related Patterns", &analysis.related_patterns),
    ] {
        if items.is_empty() {
            continue;
        }
        output.push_str(&format!("\n## {}\n\n", heading));
        for item in items {
            output.push_str(&format!("- {}\n", item));
        }
    }

    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
