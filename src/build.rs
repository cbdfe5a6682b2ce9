//! One full run of the blog generator.
//!
//! ```text
//! scan sources → load config → load template
//!     → create output dir, copy template assets
//!     → for each source: load → render → write → archive
//!     → table of contents, front page
//! ```
//!
//! Everything that can make the run pointless (no sources, a bad
//! `config.toml`, a missing or ambiguous template) is checked before the
//! output directory is touched. After that the first error aborts the run and
//! whatever was already written stays on disk; the next run overwrites it.
//!
//! Progress is reported as [`BuildEvent`]s over an optional channel so the
//! CLI can print while the pipeline works. Formatting lives in
//! [`crate::output`].

use crate::archive::Archive;
use crate::config::{self, ConfigError, SiteConfig};
use crate::document::{Document, DocumentError};
use crate::index;
use crate::markdown::Converter;
use crate::page::{self, PageError};
use crate::scan::{self, ScanError};
use crate::template::{Template, TemplateError};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Source error: {0}")]
    Scan(#[from] ScanError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
    #[error("Page error: {0}")]
    Page(#[from] PageError),
    #[error("cannot write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coarse classification of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Nothing sensible to build: bad config, template or input directory.
    Config,
    /// A source document could not be turned into a page.
    Parse,
    /// Reading or writing files failed.
    Io,
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Config(_) | BuildError::Scan(_) => ErrorKind::Config,
            BuildError::Template(TemplateError::Io { .. }) => ErrorKind::Io,
            BuildError::Template(_) => ErrorKind::Config,
            BuildError::Document(DocumentError::Io { .. }) => ErrorKind::Io,
            BuildError::Document(_) => ErrorKind::Parse,
            BuildError::Page(_) | BuildError::Output { .. } => ErrorKind::Io,
        }
    }
}

/// Where to read from and write to.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding the `*.md` sources and an optional `config.toml`.
    pub input: PathBuf,
    /// Site root; created if missing.
    pub output: PathBuf,
    /// Template file, directory holding one `.html` file, or bare name.
    pub template: PathBuf,
}

/// Progress events emitted while building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// Non-HTML files next to the template were copied.
    AssetsCopied { dir: PathBuf, count: usize },
    /// A post's directory was already on disk (typically a re-run).
    DirectoryExisted { path: PathBuf },
    /// Two sources in this run map to the same page; the later one wins.
    SlugCollision {
        output_path: PathBuf,
        previous: PathBuf,
        source_path: PathBuf,
    },
    /// A post page was written. `index` is 1-based processing order.
    DocumentWritten {
        index: usize,
        title: String,
        source_path: PathBuf,
        output_path: PathBuf,
    },
    /// The table of contents or the front page was written.
    IndexWritten { path: PathBuf },
}

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub documents: usize,
    pub collisions: usize,
    pub assets: usize,
    pub toc: Option<PathBuf>,
    pub front_page: PathBuf,
}

/// A source that parsed cleanly during [`check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedDocument {
    pub source_path: PathBuf,
    pub title: String,
    /// Page location relative to the site root.
    pub output_path: PathBuf,
}

/// Result of a dry run.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub template: PathBuf,
    pub config: SiteConfig,
    pub documents: Vec<CheckedDocument>,
}

/// Everything a run needs before touching the output directory.
struct Prepared {
    sources: Vec<PathBuf>,
    config: SiteConfig,
    template: Template,
}

fn prepare(opts: &BuildOptions) -> Result<Prepared, BuildError> {
    let sources = scan::scan(&opts.input)?;
    let config = config::load_config(&opts.input)?;
    let template = Template::load(&opts.template)?;
    Ok(Prepared {
        sources,
        config,
        template,
    })
}

fn emit(progress: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = progress {
        // A gone receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}

/// Build the whole site.
pub fn build(
    opts: &BuildOptions,
    progress: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    let Prepared {
        sources,
        config,
        template,
    } = prepare(opts)?;
    let converter = Converter::new(config.markdown.mode);
    let assets_dir = config.output.assets_dir.as_str();

    fs::create_dir_all(&opts.output).map_err(|source| BuildError::Output {
        path: opts.output.clone(),
        source,
    })?;

    let assets = template.copy_assets(&opts.output, assets_dir)?;
    if assets > 0 {
        emit(
            &progress,
            BuildEvent::AssetsCopied {
                dir: opts.output.join(assets_dir),
                count: assets,
            },
        );
    }

    let mut archive = Archive::new();
    let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut collisions = 0;

    for (i, source) in sources.iter().enumerate() {
        let doc = Document::load(source, &converter)?;
        let rendered = page::render(&doc, &template, &opts.output, assets_dir);
        let outcome = page::write(&rendered)?;

        if let Some(previous) = written.insert(rendered.output_path.clone(), source.clone()) {
            collisions += 1;
            emit(
                &progress,
                BuildEvent::SlugCollision {
                    output_path: rendered.output_path.clone(),
                    previous,
                    source_path: source.clone(),
                },
            );
        } else if outcome.dir_existed {
            let dir = rendered
                .output_path
                .parent()
                .unwrap_or(opts.output.as_path())
                .to_path_buf();
            emit(&progress, BuildEvent::DirectoryExisted { path: dir });
        }

        emit(
            &progress,
            BuildEvent::DocumentWritten {
                index: i + 1,
                title: doc.title.trim().to_string(),
                source_path: source.clone(),
                output_path: rendered.output_path.clone(),
            },
        );
        archive.insert(doc, rendered.output_path, &opts.output);
    }

    let toc = if config.output.toc {
        let path = opts.output.join(&config.output.toc_file);
        write_root_page(&path, &index::render_toc(&archive, &template, assets_dir))?;
        emit(&progress, BuildEvent::IndexWritten { path: path.clone() });
        Some(path)
    } else {
        None
    };

    let front_page = opts.output.join(&config.output.index_file);
    let html = index::render_front_page(&archive, &template, &config.site.title, assets_dir);
    write_root_page(&front_page, &html)?;
    emit(
        &progress,
        BuildEvent::IndexWritten {
            path: front_page.clone(),
        },
    );

    Ok(BuildReport {
        output: opts.output.clone(),
        documents: archive.len(),
        collisions,
        assets,
        toc,
        front_page,
    })
}

/// Validate everything a build would read, writing nothing.
pub fn check(opts: &BuildOptions) -> Result<CheckReport, BuildError> {
    let Prepared {
        sources,
        config,
        template,
    } = prepare(opts)?;
    let converter = Converter::new(config.markdown.mode);

    let documents = sources
        .iter()
        .map(|source| -> Result<CheckedDocument, BuildError> {
            let doc = Document::load(source, &converter)?;
            Ok(CheckedDocument {
                source_path: source.clone(),
                output_path: page::output_path(&doc, Path::new("")),
                title: doc.title.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CheckReport {
        template: template.path().to_path_buf(),
        config,
        documents,
    })
}

fn write_root_page(path: &Path, html: &str) -> Result<(), BuildError> {
    fs::write(path, html).map_err(|source| BuildError::Output {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{setup_blog, write_file};
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn options(root: &Path) -> BuildOptions {
        BuildOptions {
            input: root.join("posts"),
            output: root.join("blog"),
            template: root.join("template"),
        }
    }

    fn build_collecting(opts: &BuildOptions) -> (Result<BuildReport, BuildError>, Vec<BuildEvent>) {
        let (tx, rx) = mpsc::channel();
        let result = build(opts, Some(tx));
        (result, rx.into_iter().collect())
    }

    #[test]
    fn builds_pages_toc_and_front_page() {
        let tmp = setup_blog();
        let opts = options(tmp.path());
        let (result, events) = build_collecting(&opts);
        let report = result.unwrap();

        assert_eq!(report.documents, 2);
        assert_eq!(report.collisions, 0);
        assert_eq!(report.toc, Some(opts.output.join("toc.html")));
        assert!(opts.output.join("toc.html").is_file());
        assert!(opts.output.join("index.html").is_file());

        let written: Vec<&PathBuf> = events
            .iter()
            .filter_map(|e| match e {
                BuildEvent::DocumentWritten { output_path, .. } => Some(output_path),
                _ => None,
            })
            .collect();
        assert_eq!(written.len(), 2);
        for path in written {
            assert!(path.is_file());
            assert!(path.ends_with("index.html"));
        }
    }

    #[test]
    fn template_assets_copied() {
        let tmp = setup_blog();
        let opts = options(tmp.path());
        let (result, events) = build_collecting(&opts);
        assert_eq!(result.unwrap().assets, 1);
        assert!(opts.output.join("template/blog.css").is_file());
        assert!(events.contains(&BuildEvent::AssetsCopied {
            dir: opts.output.join("template"),
            count: 1,
        }));
    }

    #[test]
    fn missing_template_aborts_before_output() {
        let tmp = setup_blog();
        let mut opts = options(tmp.path());
        opts.template = tmp.path().join("nope");

        let err = build(&opts, None).unwrap_err();
        assert!(matches!(err, BuildError::Template(TemplateError::NotFound(_))));
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!opts.output.exists());
    }

    #[test]
    fn no_sources_is_config_error() {
        let tmp = setup_blog();
        let mut opts = options(tmp.path());
        opts.input = tmp.path().join("template");
        let err = build(&opts, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!opts.output.exists());
    }

    #[test]
    fn bad_config_aborts_before_output() {
        let tmp = setup_blog();
        write_file(tmp.path(), "posts/config.toml", "[output]\nbogus = 1\n");
        let opts = options(tmp.path());
        let err = build(&opts, None).unwrap_err();
        assert!(matches!(err, BuildError::Config(_)));
        assert!(!opts.output.exists());
    }

    #[test]
    fn undecodable_line_is_parse_error() {
        let tmp = setup_blog();
        let path = tmp.path().join("posts/zz-broken.md");
        fs::write(&path, b"Broken\nok\n\xff\xfe\n").unwrap();
        let err = build(&options(tmp.path()), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn rerun_reports_existing_directories() {
        let tmp = setup_blog();
        let opts = options(tmp.path());
        build(&opts, None).unwrap();

        let (result, events) = build_collecting(&opts);
        assert_eq!(result.unwrap().documents, 2);
        let existed = events
            .iter()
            .filter(|e| matches!(e, BuildEvent::DirectoryExisted { .. }))
            .count();
        assert_eq!(existed, 2);
    }

    #[test]
    fn same_title_collides_and_later_wins() {
        let tmp = setup_blog();
        write_file(tmp.path(), "posts/b-dup.md", "First Post\nSecond copy.\n");
        let opts = options(tmp.path());

        // Sources are read in name order; "b-dup.md" comes after "a-first.md".
        let (result, events) = build_collecting(&opts);
        let report = result.unwrap();
        assert_eq!(report.collisions, 1);

        let collision = events
            .iter()
            .find_map(|e| match e {
                BuildEvent::SlugCollision {
                    output_path,
                    previous,
                    source_path,
                } => Some((output_path.clone(), previous.clone(), source_path.clone())),
                _ => None,
            })
            .unwrap();
        assert!(collision.1.ends_with("a-first.md"));
        assert!(collision.2.ends_with("b-dup.md"));
        let html = fs::read_to_string(&collision.0).unwrap();
        assert!(html.contains("Second copy."));
    }

    #[test]
    fn toc_can_be_disabled() {
        let tmp = setup_blog();
        write_file(
            tmp.path(),
            "posts/config.toml",
            "[output]\ntoc = false\nindex_file = \"home.html\"\n",
        );
        let opts = options(tmp.path());
        let report = build(&opts, None).unwrap();
        assert_eq!(report.toc, None);
        assert!(!opts.output.join("toc.html").exists());
        assert!(opts.output.join("home.html").is_file());
    }

    #[test]
    fn site_title_reaches_front_page() {
        let tmp = setup_blog();
        write_file(tmp.path(), "posts/config.toml", "[site]\ntitle = \"Field Notes\"\n");
        let opts = options(tmp.path());
        build(&opts, None).unwrap();
        let html = fs::read_to_string(opts.output.join("index.html")).unwrap();
        assert!(html.contains("<title>Field Notes</title>"));
    }

    #[test]
    fn check_writes_nothing() {
        let tmp = setup_blog();
        let opts = options(tmp.path());
        let report = check(&opts).unwrap();
        assert_eq!(report.documents.len(), 2);
        assert!(report.template.ends_with("blog.html"));
        assert_eq!(report.documents[0].title, "First Post");
        assert!(report.documents[0].output_path.ends_with("first-post/index.html"));
        assert!(!opts.output.exists());
    }

    #[test]
    fn check_reports_parse_errors() {
        let tmp = setup_blog();
        write_file(tmp.path(), "posts/c-empty.md", "1234\nno letters in title\n");
        let err = check(&options(tmp.path())).unwrap_err();
        assert!(matches!(err, BuildError::Document(DocumentError::EmptySlug(_))));
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn missing_input_directory() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path());
        let err = build(&opts, None).unwrap_err();
        assert!(matches!(err, BuildError::Scan(ScanError::SourceDir { .. })));
    }
}
