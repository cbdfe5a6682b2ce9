//! Markdown to HTML conversion.
//!
//! Posts have always been converted **one line at a time**: every source line
//! goes through a fresh parser and the HTML fragments are concatenated. No
//! parser state survives between lines, so multi-line constructs (lists,
//! fenced code, paragraphs wrapping over several lines) render as separate
//! blocks. That is kept as the default so existing sites render the same.
//! [`MarkdownMode::Document`] parses the whole source in one pass instead.
//!
//! Source bytes are decoded line by line; a line that is not valid UTF-8
//! stops conversion with its 1-based line number.

use pulldown_cmark::{Parser, html};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("line {line} is not valid UTF-8: {content:?}")]
pub struct DecodeError {
    /// 1-based line number.
    pub line: usize,
    /// The offending line, lossily decoded.
    pub content: String,
}

/// How source text is handed to the Markdown parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkdownMode {
    /// Each line parsed on its own.
    #[default]
    PerLine,
    /// Whole source parsed at once.
    Document,
}

/// Stateless converter; holds only the parsing mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    mode: MarkdownMode,
}

impl Converter {
    pub fn new(mode: MarkdownMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MarkdownMode {
        self.mode
    }

    /// Convert already-decoded lines (each without its trailing newline).
    pub fn convert_lines<S: AsRef<str>>(&self, lines: &[S]) -> String {
        let mut out = String::new();
        match self.mode {
            MarkdownMode::PerLine => {
                for line in lines {
                    let mut source = String::with_capacity(line.as_ref().len() + 1);
                    source.push_str(line.as_ref());
                    source.push('\n');
                    html::push_html(&mut out, Parser::new(&source));
                }
            }
            MarkdownMode::Document => {
                let source = lines
                    .iter()
                    .map(|l| l.as_ref())
                    .collect::<Vec<_>>()
                    .join("\n");
                html::push_html(&mut out, Parser::new(&source));
            }
        }
        out
    }
}

/// Split raw bytes into lines and decode each as UTF-8.
///
/// Lines end at `\n`; a trailing `\r` is dropped. A final empty segment after
/// the last newline is not a line.
pub fn decode_lines(bytes: &[u8]) -> Result<Vec<String>, DecodeError> {
    let mut lines = Vec::new();
    let mut segments = bytes.split(|b| *b == b'\n').peekable();
    let mut number = 0;
    while let Some(segment) = segments.next() {
        number += 1;
        if segment.is_empty() && segments.peek().is_none() {
            break;
        }
        let segment = segment.strip_suffix(b"\r").unwrap_or(segment);
        match std::str::from_utf8(segment) {
            Ok(s) => lines.push(s.to_string()),
            Err(_) => {
                return Err(DecodeError {
                    line: number,
                    content: String::from_utf8_lossy(segment).into_owned(),
                });
            }
        }
    }
    Ok(lines)
}
