//! Post page rendering and writing.
//!
//! Each post lands at `<output>/YYYY/MM/DD/<slug>/index.html`, dated by its
//! creation time. Rendering is pure; [`write`] does the filesystem work.
//!
//! Re-running a build over an existing output tree is normal: directories
//! that already exist are reported, not treated as errors, and existing pages
//! are overwritten.

use crate::document::{CREATED_TOKEN, Document, MODIFIED_TOKEN};
use crate::template::{AssetPaths, PAGE_DEPTH, TITLE_TOKEN, Template};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A rendered post page and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub output_path: PathBuf,
}

/// What [`write`] found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// The page directory was already there.
    pub dir_existed: bool,
    /// A file was already at the output path and got overwritten.
    pub overwrote: bool,
}

/// `<output_root>/YYYY/MM/DD/<slug>/index.html` for a document.
pub fn output_path(doc: &Document, output_root: &Path) -> PathBuf {
    let [year, month, day] = doc.created.date_key().components();
    output_root
        .join(year)
        .join(month)
        .join(day)
        .join(&doc.slug)
        .join("index.html")
}

/// Render a post through the template.
pub fn render(
    doc: &Document,
    template: &Template,
    output_root: &Path,
    assets_dir: &str,
) -> RenderedPage {
    let paths = AssetPaths::at_depth(PAGE_DEPTH, assets_dir);
    let subs = template
        .substitutions(doc.body_html.as_str(), &paths)
        .set(TITLE_TOKEN, doc.title.trim())
        .set(CREATED_TOKEN, doc.created.byline())
        .set(MODIFIED_TOKEN, doc.modified.byline());

    RenderedPage {
        html: template.render(&subs),
        output_path: output_path(doc, output_root),
    }
}

/// Create the page directory and write the page.
pub fn write(page: &RenderedPage) -> Result<WriteOutcome, PageError> {
    let dir = page
        .output_path
        .parent()
        .unwrap_or_else(|| Path::new("."));
    let dir_existed = dir.is_dir();
    fs::create_dir_all(dir).map_err(|source| PageError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let overwrote = page.output_path.is_file();
    fs::write(&page.output_path, &page.html).map_err(|source| PageError::Io {
        path: page.output_path.clone(),
        source,
    })?;
    Ok(WriteOutcome {
        dir_existed,
        overwrote,
    })
}
