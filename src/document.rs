//! Source documents: one Markdown post each.
//!
//! A [`Document`] is built once from a source file and never changes. It
//! carries everything later stages need: title and slug (from the first
//! line), creation and modification times, the rendered body and the rendered
//! preview.
//!
//! ## Preview region
//!
//! Authors mark the excerpt shown on the front page:
//!
//! ```text
//! My Post Title
//! PREVIEW_START
//! This paragraph appears on the front page.
//! PREVIEW_END
//! The rest only appears on the post page.
//! ```
//!
//! Markers may share a line with text; only the marker itself is removed.
//! A start marker with no end marker captures the rest of the file. Without a
//! start marker the preview is empty. Markers never appear in the body.
//!
//! ## Bylines
//!
//! `POST_CREATED` and `POST_MODIFIED` anywhere in the post are replaced with
//! the matching timestamp as `DD-MM-YYYY at hh:mm AM/PM`.

use crate::markdown::{self, Converter, DecodeError};
use crate::slug;
use crate::timestamp::Timestamp;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PREVIEW_START: &str = "PREVIEW_START";
pub const PREVIEW_END: &str = "PREVIEW_END";
pub const CREATED_TOKEN: &str = "POST_CREATED";
pub const MODIFIED_TOKEN: &str = "POST_MODIFIED";

const BODY_OPEN: &str = "<article class=\"post\">\n";
const BODY_CLOSE: &str = "</article>\n";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
    #[error("{}: title line has no letters, cannot derive a slug", .0.display())]
    EmptySlug(PathBuf),
}

impl DocumentError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One converted post.
#[derive(Debug, Clone)]
pub struct Document {
    pub source_path: PathBuf,
    /// Raw first line, kept for reference.
    pub title_line: String,
    pub title: String,
    pub slug: String,
    pub created: Timestamp,
    pub modified: Timestamp,
    /// Full post HTML inside the `<article class="post">` container.
    pub body_html: String,
    /// HTML of the marked preview region; empty without markers.
    pub preview_html: String,
}

impl Document {
    /// Read a source file and its filesystem timestamps.
    pub fn load(path: &Path, converter: &Converter) -> Result<Self, DocumentError> {
        let bytes = fs::read(path).map_err(|e| DocumentError::io(path, e))?;
        let meta = fs::metadata(path).map_err(|e| DocumentError::io(path, e))?;
        let modified = meta.modified().map_err(|e| DocumentError::io(path, e))?;
        // Some filesystems don't record birth time.
        let created = match meta.created() {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::Unsupported => modified,
            Err(e) => return Err(DocumentError::io(path, e)),
        };
        Self::from_source(
            path,
            &bytes,
            Timestamp::from(created),
            Timestamp::from(modified),
            converter,
        )
    }

    /// Build a document from in-memory source.
    pub fn from_source(
        path: &Path,
        bytes: &[u8],
        created: Timestamp,
        modified: Timestamp,
        converter: &Converter,
    ) -> Result<Self, DocumentError> {
        let lines = markdown::decode_lines(bytes).map_err(|source| DocumentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let title_line = lines.first().cloned().unwrap_or_default();
        let derived = slug::derive(&title_line);
        if derived.slug.is_empty() {
            return Err(DocumentError::EmptySlug(path.to_path_buf()));
        }

        let body_lines: Vec<String> = lines.iter().map(|l| strip_markers(l)).collect();
        let body = format!(
            "{BODY_OPEN}{}{BODY_CLOSE}",
            converter.convert_lines(&body_lines)
        );

        let preview = extract_preview(&lines);
        let preview = if preview.is_empty() {
            String::new()
        } else {
            converter.convert_lines(&preview)
        };

        Ok(Self {
            source_path: path.to_path_buf(),
            title_line,
            title: derived.title,
            slug: derived.slug,
            created,
            modified,
            body_html: substitute_bylines(&body, &created, &modified),
            preview_html: substitute_bylines(&preview, &created, &modified),
        })
    }
}

fn strip_markers(line: &str) -> String {
    line.replace(PREVIEW_START, "").replace(PREVIEW_END, "")
}

/// Lines of the preview region, markers removed.
fn extract_preview(lines: &[String]) -> Vec<String> {
    let mut preview = Vec::new();
    let mut capturing = false;

    for line in lines {
        let mut rest = line.as_str();
        let mut kept = String::new();

        if !capturing {
            match rest.find(PREVIEW_START) {
                Some(pos) => {
                    capturing = true;
                    rest = &rest[pos + PREVIEW_START.len()..];
                }
                None => continue,
            }
        }

        if let Some(pos) = rest.find(PREVIEW_END) {
            kept.push_str(&rest[..pos]);
            push_marker_line(&mut preview, &kept, line);
            break;
        }
        kept.push_str(rest);
        push_marker_line(&mut preview, &kept, line);
    }

    preview
}

/// Marker lines contribute their trimmed leftover text, if any.
fn push_marker_line(preview: &mut Vec<String>, kept: &str, original: &str) {
    let had_marker = original.contains(PREVIEW_START) || original.contains(PREVIEW_END);
    if !had_marker {
        preview.push(kept.to_string());
    } else if !kept.trim().is_empty() {
        preview.push(strip_markers(kept.trim()));
    }
}

fn substitute_bylines(html: &str, created: &Timestamp, modified: &Timestamp) -> String {
    html.replace(CREATED_TOKEN, &created.byline())
        .replace(MODIFIED_TOKEN, &modified.byline())
}
