//! Shared test utilities for the genson test suite.
//!
//! Provides fixed timestamps, in-memory documents, and a small on-disk blog
//! so tests don't depend on real file creation times.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let doc = document("hello.md", "Hello World\nBody\n", stamp(2024, 3, 5, 10, 0));
//! assert_eq!(doc.slug, "hello-world");
//!
//! let tmp = setup_blog();
//! let posts = tmp.path().join("posts");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::document::Document;
use crate::markdown::Converter;
use crate::timestamp::Timestamp;

// =========================================================================
// Values
// =========================================================================

/// A UTC timestamp. Panics on an impossible date.
pub fn stamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Timestamp {
    Timestamp::from_ymd_hm(year, month, day, hour, minute)
        .unwrap_or_else(|| panic!("invalid test date {year}-{month}-{day} {hour}:{minute}"))
}

/// Build a document from source text, with `modified == created`.
pub fn document(file_name: &str, source: &str, created: Timestamp) -> Document {
    Document::from_source(
        Path::new(file_name),
        source.as_bytes(),
        created,
        created,
        &Converter::default(),
    )
    .unwrap_or_else(|e| panic!("test document {file_name} failed to load: {e}"))
}

// =========================================================================
// Filesystem
// =========================================================================

/// Write `contents` to `dir/rel`, creating parent directories.
pub fn write_file(dir: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

pub const BLOG_TEMPLATE: &str = "<!DOCTYPE html>
<html>
<head>
<title>INSERT_TITLE_HERE</title>
<link rel=\"stylesheet\" href=\"CSS_FILE\">
</head>
<body>
<nav><a href=\"SITE_ROOT/index.html\">Home</a> <a href=\"SITE_ROOT/toc.html\">Archive</a></nav>
INSERT_POST_HERE
</body>
</html>
";

/// A temp directory laid out as:
///
/// ```text
/// posts/a-first.md
/// posts/b-second.md
/// template/blog.html
/// template/blog.css
/// ```
pub fn setup_blog() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_file(
        tmp.path(),
        "posts/a-first.md",
        "First Post\nPREVIEW_START\nThe *opening* line.\nPREVIEW_END\nThe rest.\n",
    );
    write_file(
        tmp.path(),
        "posts/b-second.md",
        "Second Post!\nWritten POST_CREATED.\n",
    );
    write_file(tmp.path(), "template/blog.html", BLOG_TEMPLATE);
    write_file(tmp.path(), "template/blog.css", "body { margin: 0 auto; }\n");
    tmp
}
