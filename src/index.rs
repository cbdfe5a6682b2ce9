//! Table of contents and front page.
//!
//! Both pages walk the [`Archive`] newest-first and are rendered through the
//! same template as the posts, at the output root.
//!
//! ## Table of contents
//!
//! ```text
//! Table of Contents
//! 2024                       <h2>
//!   03                       <h3>
//!     05                     <h4>
//!       • Hello World        <a class="contents-item">
//! ```
//!
//! ## Front page
//!
//! One `article.preview` block per post: created byline, linked title, the
//! post's preview HTML (possibly empty) and a "Read more" link.
//!
//! Fragments are built with maud, so titles and dates are escaped. Preview
//! HTML is already rendered and is inserted as-is.

use crate::archive::Archive;
use crate::document::{CREATED_TOKEN, MODIFIED_TOKEN};
use crate::template::{AssetPaths, TITLE_TOKEN, Template};
use maud::{Markup, PreEscaped, html};

pub const TOC_HEADING: &str = "Table of Contents";

/// Build the table-of-contents fragment.
pub fn toc_markup(archive: &Archive) -> Markup {
    // (bucket, starts a new year, starts a new month)
    let mut rows = Vec::new();
    let mut previous: Option<(i32, u32)> = None;
    for bucket in archive.enumerate() {
        let new_year = previous.map(|(y, _)| y) != Some(bucket.year);
        let new_month = new_year || previous.map(|(_, m)| m) != Some(bucket.month);
        previous = Some((bucket.year, bucket.month));
        rows.push((bucket, new_year, new_month));
    }

    html! {
        h1 { (TOC_HEADING) }
        @for (bucket, new_year, new_month) in &rows {
            @if *new_year {
                h2 { (format!("{:04}", bucket.year)) }
            }
            @if *new_month {
                h3 { (format!("{:02}", bucket.month)) }
            }
            h4 { (format!("{:02}", bucket.day)) }
            ul {
                @for entry in bucket.entries {
                    li {
                        a class="contents-item" href=(entry.href) { (entry.document.title.trim()) }
                    }
                }
            }
        }
    }
}

/// Build the front-page fragment.
pub fn front_page_markup(archive: &Archive) -> Markup {
    html! {
        @for entry in archive.entries() {
            article class="preview" {
                p class="post-date" { (entry.document.created.byline()) }
                h2 {
                    a href=(entry.href) { (entry.document.title.trim()) }
                }
                div class="preview-content" {
                    (PreEscaped(entry.document.preview_html.as_str()))
                }
                a class="read-more" href=(entry.href) { "Read more" }
            }
        }
    }
}

/// Full table-of-contents page.
pub fn render_toc(archive: &Archive, template: &Template, assets_dir: &str) -> String {
    render_root_page(toc_markup(archive), TOC_HEADING, template, assets_dir)
}

/// Full front page.
pub fn render_front_page(
    archive: &Archive,
    template: &Template,
    site_title: &str,
    assets_dir: &str,
) -> String {
    render_root_page(front_page_markup(archive), site_title, template, assets_dir)
}

fn render_root_page(content: Markup, title: &str, template: &Template, assets_dir: &str) -> String {
    let paths = AssetPaths::at_depth(0, assets_dir);
    let subs = template
        .substitutions(content.into_string(), &paths)
        .set(TITLE_TOKEN, html! { (title) }.into_string())
        // Root pages have no post of their own to date.
        .set(CREATED_TOKEN, "")
        .set(MODIFIED_TOKEN, "");
    template.render(&subs)
}
