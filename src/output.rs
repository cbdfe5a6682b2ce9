//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Template assets: 2 files → blog/template
//! Wrote: blog/2024/03/05/hello-world/index.html
//!     001 Hello World
//!     Source: posts/hello.md
//! Warning: directory already exists: blog/2024/03/05/field-notes
//! Wrote: blog/2024/03/05/field-notes/index.html
//!     002 Field Notes
//!     Source: posts/notes.md
//! Wrote: toc.html
//! Wrote: index.html
//!
//! Generated 2 posts → blog
//! ```
//!
//! ## Check
//!
//! ```text
//! Template
//!     template/blog.html
//!
//! Posts
//! 001 Hello World → 2024/03/05/hello-world/index.html
//!     Source: posts/hello.md
//!
//! Config
//!     title: Blog
//!     markdown: per-line
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::build::{BuildEvent, BuildReport, CheckReport};
use crate::markdown::MarkdownMode;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 post`, `2 posts`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Build output
// ============================================================================

/// Format a single build progress event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::AssetsCopied { dir, count: n } => {
            vec![format!(
                "Template assets: {} \u{2192} {}",
                count(*n, "file"),
                dir.display()
            )]
        }
        BuildEvent::DirectoryExisted { path } => {
            vec![format!("Warning: directory already exists: {}", path.display())]
        }
        BuildEvent::SlugCollision {
            output_path,
            previous,
            source_path,
        } => vec![
            format!(
                "Warning: {} overwrites {}",
                source_path.display(),
                output_path.display()
            ),
            format!("{}Previously written from: {}", indent(1), previous.display()),
        ],
        BuildEvent::DocumentWritten {
            index,
            title,
            source_path,
            output_path,
        } => vec![
            format!("Wrote: {}", output_path.display()),
            format!("{}{} {}", indent(1), format_index(*index), title),
            format!("{}Source: {}", indent(1), source_path.display()),
        ],
        BuildEvent::IndexWritten { path } => vec![format!("Wrote: {}", file_name(path))],
    }
}

/// Format the end-of-build summary.
pub fn format_build_summary(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "Generated {} \u{2192} {}",
            count(report.documents, "post"),
            report.output.display()
        ),
    ];
    if report.collisions > 0 {
        lines.push(format!(
            "{}{} overwritten by later posts",
            indent(1),
            count(report.collisions, "page")
        ));
    }
    lines
}

pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        println!("{}", line);
    }
}

pub fn print_build_summary(report: &BuildReport) {
    for line in format_build_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format a dry-run report: template, posts in build order, effective config.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![
        "Template".to_string(),
        format!("{}{}", indent(1), report.template.display()),
        String::new(),
        "Posts".to_string(),
    ];

    for (i, doc) in report.documents.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            doc.title,
            doc.output_path.display()
        ));
        lines.push(format!("{}Source: {}", indent(1), doc.source_path.display()));
    }

    let mode = match report.config.markdown.mode {
        MarkdownMode::PerLine => "per-line",
        MarkdownMode::Document => "document",
    };
    lines.push(String::new());
    lines.push("Config".to_string());
    lines.push(format!("{}title: {}", indent(1), report.config.site.title));
    lines.push(format!("{}markdown: {}", indent(1), mode));
    if !report.config.output.toc {
        lines.push(format!("{}table of contents: off", indent(1)));
    }
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}
