//! Date-keyed archive of every post written in a run.
//!
//! Posts are filed under year → month → day as they are written. Within a
//! day, posts keep the order they were inserted in (processing order). The
//! archive is read newest-first to build the table of contents and the front
//! page:
//!
//! ```text
//! 2024
//!   03
//!     05   [first-post, second-post]
//!     01   [...]
//!   01
//!     ...
//! 2023
//!   ...
//! ```

use crate::document::Document;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A written post and where it lives.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub document: Document,
    pub output_path: PathBuf,
    /// Link target relative to the site root, `/`-separated.
    pub href: String,
}

/// One day's posts during newest-first enumeration.
#[derive(Debug, Clone, Copy)]
pub struct DayBucket<'a> {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub entries: &'a [ArchiveEntry],
}

type Days = BTreeMap<u32, Vec<ArchiveEntry>>;
type Months = BTreeMap<u32, Days>;

#[derive(Debug, Default)]
pub struct Archive {
    years: BTreeMap<i32, Months>,
    len: usize,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a written post under its creation date.
    pub fn insert(&mut self, document: Document, output_path: PathBuf, output_root: &Path) {
        let key = document.created.date_key();
        let href = site_href(&output_path, output_root);
        self.years
            .entry(key.year)
            .or_default()
            .entry(key.month)
            .or_default()
            .entry(key.day)
            .or_default()
            .push(ArchiveEntry {
                document,
                output_path,
                href,
            });
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Days newest first; posts within a day in insertion order.
    pub fn enumerate(&self) -> impl Iterator<Item = DayBucket<'_>> {
        self.years.iter().rev().flat_map(|(&year, months)| {
            months.iter().rev().flat_map(move |(&month, days)| {
                days.iter().rev().map(move |(&day, entries)| DayBucket {
                    year,
                    month,
                    day,
                    entries,
                })
            })
        })
    }

    /// All entries in newest-first order.
    pub fn entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.enumerate().flat_map(|bucket| bucket.entries.iter())
    }
}

/// `output_path` relative to `output_root`, joined with `/`.
fn site_href(output_path: &Path, output_root: &Path) -> String {
    output_path
        .strip_prefix(output_root)
        .unwrap_or(output_path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .filter(|c| !c.is_empty() && c != "/")
        .collect::<Vec<_>>()
        .join("/")
}
