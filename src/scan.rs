//! Source discovery.
//!
//! Every `*.md` file directly inside the input directory is a post.
//! Subdirectories and other files are ignored. Posts are processed in
//! file-name order, which is also the order of posts within a day in the
//! archive.
//!
//! An input directory that can't be read, or that has no Markdown files, is
//! a configuration error: there would be nothing to build.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read input directory {}: {source}", .path.display())]
    SourceDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No Markdown files in this directory: {}", .0.display())]
    NoMarkdown(PathBuf),
}

/// List the Markdown sources in `dir`, sorted by file name.
pub fn scan(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let source_dir = |source| ScanError::SourceDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut md_files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(source_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_markdown(p))
        .collect();

    if md_files.is_empty() {
        return Err(ScanError::NoMarkdown(dir.to_path_buf()));
    }

    md_files.sort();
    Ok(md_files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().map(|e| e == "md").unwrap_or(false)
}
