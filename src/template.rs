//! Page template loading and token substitution.
//!
//! A site has exactly one HTML template. It is plain HTML with sentinel
//! tokens that are replaced literally (there is no expression language):
//!
//! | Token | Replaced with |
//! |-------|---------------|
//! | `INSERT_POST_HERE` | the page content, inserted verbatim |
//! | `INSERT_TITLE_HERE` | the page title |
//! | `SITE_ROOT` | relative path from the page to the output root |
//! | `TEMPLATE_ROOT` | relative path from the page to the copied template assets |
//! | `CSS_FILE` / `JS_FILE` | `TEMPLATE_ROOT/<template-stem>.css` / `.js` |
//! | `POST_CREATED` / `POST_MODIFIED` | post bylines (post pages only) |
//!
//! Tokens the caller doesn't supply are left as they are. The content is
//! spliced in after every other token has been replaced, so text in a post
//! that happens to look like a token is never rewritten.
//!
//! ## Locating the template
//!
//! The `--template` path may be:
//!
//! - a directory holding exactly one `*.html` file (zero or several is a
//!   configuration error),
//! - an HTML file,
//! - a bare name `blog` meaning `blog.html`.
//!
//! Everything else in the template's directory (stylesheets, scripts, fonts)
//! is copied into the output so the generated site is self-contained.
//!
//! ## Relative asset paths
//!
//! Pages are written at a known depth below the output root: post pages at
//! `YYYY/MM/DD/<slug>/index.html` ([`PAGE_DEPTH`] = 4), index pages at the
//! root (depth 0). [`AssetPaths::at_depth`] turns that depth into `../`
//! segments.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const POST_TOKEN: &str = "INSERT_POST_HERE";
pub const TITLE_TOKEN: &str = "INSERT_TITLE_HERE";
pub const SITE_ROOT_TOKEN: &str = "SITE_ROOT";
pub const TEMPLATE_ROOT_TOKEN: &str = "TEMPLATE_ROOT";
pub const CSS_TOKEN: &str = "CSS_FILE";
pub const JS_TOKEN: &str = "JS_FILE";

/// Directory depth of a post page below the output root (year/month/day/slug).
pub const PAGE_DEPTH: usize = 4;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("no .html template in directory {}", .0.display())]
    Missing(PathBuf),
    #[error("template directory {} holds more than one .html file: {}", .dir.display(), list(.candidates))]
    Ambiguous {
        dir: PathBuf,
        candidates: Vec<PathBuf>,
    },
    #[error("template IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl TemplateError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The loaded site template. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    text: String,
    /// Set when the template was picked out of a directory; the whole
    /// directory is then the asset bundle.
    bundle: Option<PathBuf>,
}

/// Relative paths from a page to the output root and to the template assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub site_root: String,
    pub template_root: String,
}

impl AssetPaths {
    /// Paths for a page `depth` directories below the output root.
    pub fn at_depth(depth: usize, assets_dir: &str) -> Self {
        let site_root = if depth == 0 {
            ".".to_string()
        } else {
            vec![".."; depth].join("/")
        };
        let template_root = format!("{site_root}/{assets_dir}");
        Self {
            site_root,
            template_root,
        }
    }
}

/// Token values for one render. The content is kept apart from the other
/// tokens because it is inserted verbatim.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    content: String,
    tokens: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tokens: Vec::new(),
        }
    }

    /// Add or replace a token value.
    pub fn set(mut self, token: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.tokens.iter_mut().find(|(t, _)| t == token) {
            Some(entry) => entry.1 = value,
            None => self.tokens.push((token.to_string(), value)),
        }
        self
    }
}

impl Template {
    /// Locate and read the template.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let file = resolve(path)?;
        let text = fs::read_to_string(&file).map_err(|e| TemplateError::io(&file, e))?;
        let bundle = path.is_dir().then(|| path.to_path_buf());
        Ok(Self {
            path: file,
            text,
            bundle,
        })
    }

    /// Build a template from text, e.g. for tests or an embedded default.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            bundle: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// File stem, used for the `CSS_FILE` / `JS_FILE` names.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Text before the first content token.
    pub fn head(&self) -> &str {
        self.text.split(POST_TOKEN).next().unwrap_or_default()
    }

    /// Text after the first content token; empty if there is none.
    pub fn tail(&self) -> &str {
        self.text
            .split_once(POST_TOKEN)
            .map(|(_, tail)| tail)
            .unwrap_or_default()
    }

    /// Substitution set with the asset tokens filled in for `paths`.
    pub fn substitutions(&self, content: impl Into<String>, paths: &AssetPaths) -> Substitutions {
        let stem = self.stem();
        Substitutions::new(content)
            .set(SITE_ROOT_TOKEN, paths.site_root.clone())
            .set(TEMPLATE_ROOT_TOKEN, paths.template_root.clone())
            .set(CSS_TOKEN, format!("{}/{stem}.css", paths.template_root))
            .set(JS_TOKEN, format!("{}/{stem}.js", paths.template_root))
    }

    /// Produce a page. The template itself is left untouched.
    pub fn render(&self, subs: &Substitutions) -> String {
        self.text
            .split(POST_TOKEN)
            .map(|segment| replace_tokens(segment, &subs.tokens))
            .collect::<Vec<_>>()
            .join(&subs.content)
    }

    /// Copy the template's assets into `output_root/assets_dir`.
    ///
    /// A template loaded from a directory brings everything in that directory
    /// except HTML and hidden entries. A template named as a file (or bare
    /// name) brings only its same-stem siblings: `blog.css`, `blog.js`, ...
    ///
    /// Returns the number of files copied.
    pub fn copy_assets(&self, output_root: &Path, assets_dir: &str) -> Result<usize, TemplateError> {
        let dst = output_root.join(assets_dir);
        match &self.bundle {
            Some(dir) => copy_tree(dir, output_root, &dst),
            None => self.copy_siblings(&dst),
        }
    }

    fn copy_siblings(&self, dst: &Path) -> Result<usize, TemplateError> {
        let src = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let stem = self.stem();
        let mut siblings: Vec<PathBuf> = fs::read_dir(src)
            .map_err(|e| TemplateError::io(src, e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && !is_html(p)
                    && !is_hidden(p)
                    && p.file_stem().is_some_and(|s| s.to_string_lossy() == stem)
            })
            .collect();
        siblings.sort();

        for path in &siblings {
            let Some(name) = path.file_name() else {
                continue;
            };
            copy_file(path, &dst.join(name))?;
        }
        Ok(siblings.len())
    }
}

fn copy_tree(src: &Path, output_root: &Path, dst: &Path) -> Result<usize, TemplateError> {
    let output_canon = fs::canonicalize(output_root).ok();
    let mut copied = 0;

    // Hidden entries are pruned whole; so is the output root when it sits
    // inside the template directory.
    let walker = WalkDir::new(src).min_depth(1).into_iter().filter_entry(|e| {
        if is_hidden(e.path()) {
            return false;
        }
        !e.file_type().is_dir()
            || output_canon
                .as_deref()
                .is_none_or(|out| fs::canonicalize(e.path()).map_or(true, |p| p != out))
    });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            TemplateError::io(&path, e.into())
        })?;
        let path = entry.path();
        if entry.file_type().is_dir() || is_html(path) {
            continue;
        }
        let rel = path.strip_prefix(src).unwrap_or(path);
        copy_file(path, &dst.join(rel))?;
        copied += 1;
    }
    Ok(copied)
}

fn copy_file(from: &Path, to: &Path) -> Result<(), TemplateError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| TemplateError::io(parent, e))?;
    }
    fs::copy(from, to).map_err(|e| TemplateError::io(from, e))?;
    Ok(())
}

fn replace_tokens(segment: &str, tokens: &[(String, String)]) -> String {
    tokens
        .iter()
        .fold(segment.to_string(), |acc, (token, value)| {
            acc.replace(token.as_str(), value)
        })
}

fn resolve(path: &Path) -> Result<PathBuf, TemplateError> {
    if path.is_dir() {
        let mut candidates: Vec<PathBuf> = fs::read_dir(path)
            .map_err(|e| TemplateError::io(path, e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_html(p))
            .collect();
        candidates.sort();
        return match candidates.len() {
            0 => Err(TemplateError::Missing(path.to_path_buf())),
            1 => Ok(candidates.remove(0)),
            _ => Err(TemplateError::Ambiguous {
                dir: path.to_path_buf(),
                candidates,
            }),
        };
    }
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    let named = path.with_extension("html");
    if named.is_file() {
        return Ok(named);
    }
    Err(TemplateError::NotFound(path.to_path_buf()))
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("html"))
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    const SKELETON: &str = "<html><head><title>INSERT_TITLE_HERE</title>\
<link href=\"CSS_FILE\"></head><body>INSERT_POST_HERE</body></html>";

    #[test]
    fn asset_paths_at_root() {
        let p = AssetPaths::at_depth(0, "template");
        assert_eq!(p.site_root, ".");
        assert_eq!(p.template_root, "./template");
    }

    #[test]
    fn asset_paths_at_page_depth() {
        let p = AssetPaths::at_depth(PAGE_DEPTH, "static");
        assert_eq!(p.site_root, "../../../..");
        assert_eq!(p.template_root, "../../../../static");
    }

    #[test]
    fn render_substitutes_tokens() {
        let t = Template::from_text("t/blog.html", SKELETON);
        let subs = t
            .substitutions("<p>hi</p>", &AssetPaths::at_depth(PAGE_DEPTH, "template"))
            .set(TITLE_TOKEN, "My Post");
        let html = t.render(&subs);
        assert_eq!(
            html,
            "<html><head><title>My Post</title>\
<link href=\"../../../../template/blog.css\"></head><body><p>hi</p></body></html>"
        );
    }

    #[test]
    fn render_leaves_template_unchanged() {
        let t = Template::from_text("blog.html", SKELETON);
        let before = t.text().to_string();
        let _ = t.render(&Substitutions::new("x").set(TITLE_TOKEN, "T"));
        assert_eq!(t.text(), before);
    }

    #[test]
    fn unmatched_tokens_stay_verbatim() {
        let t = Template::from_text("blog.html", SKELETON);
        let html = t.render(&Substitutions::new("body"));
        assert!(html.contains("INSERT_TITLE_HERE"));
        assert!(html.contains("CSS_FILE"));
    }

    #[test]
    fn content_is_not_rescanned_for_tokens() {
        let t = Template::from_text("blog.html", SKELETON);
        let html = t.render(&Substitutions::new("literal INSERT_TITLE_HERE").set(TITLE_TOKEN, "T"));
        assert!(html.contains("<body>literal INSERT_TITLE_HERE</body>"));
    }

    #[test]
    fn round_trip_between_head_and_tail() {
        let t = Template::from_text("blog.html", "<header>A</header>INSERT_POST_HERE<footer>B</footer>");
        let bodies = [
            "",
            "<p>plain</p>\n",
            "<article class=\"post\">\n<h1>x</h1>\n</article>\n",
            "contains <header>A</header> twice <footer>B</footer>",
        ];
        for body in bodies {
            let html = t.render(&Substitutions::new(body));
            let inner = html
                .strip_prefix(t.head())
                .and_then(|rest| rest.strip_suffix(t.tail()))
                .unwrap();
            assert_eq!(inner, body);
        }
    }

    #[test]
    fn head_and_tail_without_post_token() {
        let t = Template::from_text("blog.html", "<p>static</p>");
        assert_eq!(t.head(), "<p>static</p>");
        assert_eq!(t.tail(), "");
    }

    #[test]
    fn set_replaces_existing_token() {
        let t = Template::from_text("blog.html", "INSERT_TITLE_HERE");
        let subs = Substitutions::new("").set(TITLE_TOKEN, "a").set(TITLE_TOKEN, "b");
        assert_eq!(t.render(&subs), "b");
    }

    #[test]
    fn load_from_directory_with_one_html() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "blog.html", SKELETON);
        write_file(tmp.path(), "blog.css", "body {}");
        let t = Template::load(tmp.path()).unwrap();
        assert_eq!(t.stem(), "blog");
        assert_eq!(t.text(), SKELETON);
    }

    #[test]
    fn load_from_directory_without_html_is_missing() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "blog.css", "body {}");
        let result = Template::load(tmp.path());
        assert!(matches!(result, Err(TemplateError::Missing(_))));
    }

    #[test]
    fn load_from_directory_with_two_html_is_ambiguous() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "a.html", SKELETON);
        write_file(tmp.path(), "b.html", SKELETON);
        match Template::load(tmp.path()) {
            Err(TemplateError::Ambiguous { candidates, .. }) => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn load_by_bare_name() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "blog.html", SKELETON);
        let t = Template::load(&tmp.path().join("blog")).unwrap();
        assert_eq!(t.stem(), "blog");
    }

    #[test]
    fn load_nonexistent_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Template::load(&tmp.path().join("nope"));
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn copy_assets_skips_html_and_hidden() {
        let tmp = TempDir::new().unwrap();
        let tdir = tmp.path().join("template");
        write_file(&tdir, "blog.html", SKELETON);
        write_file(&tdir, "blog.css", "body {}");
        write_file(&tdir, "fonts/serif.woff2", "font");
        write_file(&tdir, ".DS_Store", "junk");
        let out = tmp.path().join("out");

        let t = Template::load(&tdir).unwrap();
        let copied = t.copy_assets(&out, "template").unwrap();

        assert_eq!(copied, 2);
        assert!(out.join("template/blog.css").is_file());
        assert!(out.join("template/fonts/serif.woff2").is_file());
        assert!(!out.join("template/blog.html").exists());
        assert!(!out.join("template/.DS_Store").exists());
    }

    #[test]
    fn copy_assets_prunes_hidden_directories() {
        let tmp = TempDir::new().unwrap();
        let tdir = tmp.path().join("template");
        write_file(&tdir, "blog.html", SKELETON);
        write_file(&tdir, "blog.css", "body {}");
        write_file(&tdir, ".git/HEAD", "ref: refs/heads/main");
        write_file(&tdir, ".cache/fonts/serif.woff2", "font");
        let out = tmp.path().join("out");

        let t = Template::load(&tdir).unwrap();
        assert_eq!(t.copy_assets(&out, "template").unwrap(), 1);
        assert!(!out.join("template/.git").exists());
        assert!(!out.join("template/.cache").exists());
    }

    #[test]
    fn copy_assets_skips_output_inside_template_dir() {
        let tmp = TempDir::new().unwrap();
        let tdir = tmp.path().join("theme");
        write_file(&tdir, "blog.html", SKELETON);
        write_file(&tdir, "blog.css", "body {}");
        let out = tdir.join("site");
        write_file(&out, "index.html", "old");
        write_file(&out, "2024/03/05/post/index.html", "old");
        write_file(&out, "template/blog.css", "stale");

        let t = Template::load(&tdir).unwrap();
        let copied = t.copy_assets(&out, "template").unwrap();

        assert_eq!(copied, 1);
        assert_eq!(fs::read_to_string(out.join("template/blog.css")).unwrap(), "body {}");
        assert!(!out.join("template/site").exists());
    }

    #[test]
    fn bare_name_copies_only_same_stem_siblings() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        write_file(dir, "blog.html", SKELETON);
        write_file(dir, "blog.css", "body {}");
        write_file(dir, "blog.js", "// js");
        write_file(dir, "notes.css", "unrelated");
        write_file(dir, "posts/secret-draft.md", "Draft");
        write_file(dir, ".git/HEAD", "ref: refs/heads/main");
        write_file(dir, ".git/config", "[core]");
        let out = dir.join("out");
        fs::create_dir_all(&out).unwrap();

        let t = Template::load(&dir.join("blog")).unwrap();
        let copied = t.copy_assets(&out, "template").unwrap();

        assert_eq!(copied, 2);
        assert!(out.join("template/blog.css").is_file());
        assert!(out.join("template/blog.js").is_file());
        assert!(!out.join("template/notes.css").exists());
        assert!(!out.join("template/posts").exists());
        assert!(!out.join("template/.git").exists());
    }

    #[test]
    fn html_file_path_copies_only_same_stem_siblings() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("site-src");
        let file = write_file(&dir, "blog.html", SKELETON);
        write_file(&dir, "blog.css", "body {}");
        write_file(&dir, "fonts/serif.woff2", "font");
        let out = tmp.path().join("out");

        let t = Template::load(&file).unwrap();
        assert_eq!(t.copy_assets(&out, "assets").unwrap(), 1);
        assert!(out.join("assets/blog.css").is_file());
        assert!(!out.join("assets/fonts").exists());
    }
}
