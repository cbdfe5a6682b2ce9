//! # genson
//!
//! A small static blog generator. A flat directory of Markdown posts goes in;
//! a dated site comes out:
//!
//! ```text
//! posts/                          blog/
//! ├── config.toml   (optional)    ├── index.html        front page with previews
//! ├── hello.md              →     ├── toc.html          table of contents
//! └── field-notes.md              ├── template/         template assets (CSS, JS, ...)
//!                                 └── 2024/03/05/hello-world/index.html
//! template/
//! ├── blog.html     the one page template
//! └── blog.css
//! ```
//!
//! The first line of a post is its title. The page is filed under the
//! source file's creation date and a slug made from the title.
//!
//! # Pipeline
//!
//! ```text
//! scan → config → template → (document → page → archive)* → toc + front page
//! ```
//!
//! A run is always a full rebuild. Nothing is cached between runs.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`slug`] | Title line → display title and URL slug |
//! | [`timestamp`] | Filesystem times as UTC stamps, path parts and bylines |
//! | [`markdown`] | UTF-8 line decoding and Markdown → HTML via pulldown-cmark |
//! | [`document`] | One post: title, slug, dates, body and preview HTML |
//! | [`template`] | Loading the page template, token substitution, asset copying |
//! | [`page`] | Rendering and writing `YYYY/MM/DD/<slug>/index.html` |
//! | [`archive`] | Year → month → day index of written posts, newest first |
//! | [`index`] | Table of contents and front page, built with Maud |
//! | [`scan`] | Finding the `*.md` sources |
//! | [`config`] | `config.toml` loading, merging over defaults, validation |
//! | [`build`] | The pipeline itself, with progress events |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Plain Token Templates
//!
//! The page template is ordinary HTML with a handful of literal tokens
//! (`INSERT_POST_HERE`, `INSERT_TITLE_HERE`, `SITE_ROOT`, `TEMPLATE_ROOT`,
//! `CSS_FILE`, `JS_FILE`, `POST_CREATED`, `POST_MODIFIED`). No loops, no
//! conditionals. The post body is spliced in after every other token has been
//! replaced, so text in a post that happens to look like a token is left alone.
//! Generated fragments (table of contents, previews) use Maud so that titles
//! are escaped.
//!
//! ## Relative Links Everywhere
//!
//! Every page links to the site root and the template assets with relative
//! paths computed from its depth (post pages sit four levels down). The output
//! directory can be moved or served from any prefix.
//!
//! ## Per-Line Markdown by Default
//!
//! Posts are converted one line at a time unless `markdown.mode = "document"`
//! is set. Multi-line constructs (lists, paragraphs spanning lines) render as
//! separate blocks in the default mode; old posts written against that
//! behaviour keep their layout.
//!
//! ## Slugs Are Not Deduplicated
//!
//! Two posts with the same title on the same day map to the same page. The
//! later one in file-name order wins and the build reports the collision.

pub mod archive;
pub mod build;
pub mod config;
pub mod document;
pub mod index;
pub mod markdown;
pub mod output;
pub mod page;
pub mod scan;
pub mod slug;
pub mod template;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod test_helpers;
