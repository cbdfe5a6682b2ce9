//! Title and slug derivation from a post's first line.
//!
//! Every post's first line is its title line. Two values come out of it:
//!
//! - **Title**: the line with everything except ASCII letters and spaces
//!   removed. Case and spacing are kept as written.
//! - **Slug**: the same letters, lowercased, split into words and joined with
//!   `-`. Used as the post's directory name in the output tree.
//!
//! ```text
//! "Hello, World!"      → title "Hello World",   slug "hello-world"
//! "  Rust   2024 notes" → title "  Rust    notes", slug "rust-notes"
//! "Well-known facts"   → title "Wellknown facts", slug "well-known-facts"
//! ```
//!
//! Hyphens are dropped from the title but count as word breaks in the slug,
//! so feeding a slug back through [`derive`] yields the same slug.
//!
//! Slugs are not made unique. Two posts with the same title on the same day
//! share an output path; the build reports the collision and the later post
//! wins.

/// Result of deriving a title and slug from a title line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSlug {
    /// Letters and spaces from the title line, original casing.
    pub title: String,
    /// Lowercase words joined by `-`. Empty if the line had no letters.
    pub slug: String,
}

/// Derive the display title and URL slug from a raw title line.
pub fn derive(line: &str) -> TitleSlug {
    let line = line.trim_end();

    let title: String = line
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .collect();

    let words: String = line
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
            ' ' | '-' => Some(' '),
            _ => None,
        })
        .collect();

    let slug = words
        .split(' ')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    TitleSlug { title, slug }
}
