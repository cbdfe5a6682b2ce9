//! Site configuration.
//!
//! An optional `config.toml` in the input directory tunes the build. It is
//! layered over the stock defaults, so a file only needs the keys it changes:
//!
//! ```toml
//! [site]
//! title = "Field Notes"
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Blog"              # Title of the front page
//!
//! [output]
//! toc = true                  # Write the table of contents page
//! toc_file = "toc.html"       # Table of contents file name (output root)
//! index_file = "index.html"   # Front page file name (output root)
//! assets_dir = "template"     # Template assets are copied here (output root)
//!
//! [markdown]
//! mode = "per-line"           # "per-line" or "document"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::markdown::MarkdownMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide text.
    pub site: SiteSection,
    /// Output file layout.
    pub output: OutputConfig,
    /// Markdown conversion.
    pub markdown: MarkdownConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Title of the front page.
    pub title: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Whether to write the table of contents page.
    pub toc: bool,
    /// Table of contents file name, written at the output root.
    pub toc_file: String,
    /// Front page file name, written at the output root.
    pub index_file: String,
    /// Directory under the output root that receives the template's assets.
    pub assets_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            toc: true,
            toc_file: "toc.html".to_string(),
            index_file: "index.html".to_string(),
            assets_dir: "template".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    /// `per-line` parses each source line on its own; `document` parses the whole file.
    pub mode: MarkdownMode,
}

impl SiteConfig {
    /// Check values that deserialize fine but can't produce a sane site.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let out = &self.output;
        for (key, name) in [("output.toc_file", &out.toc_file), ("output.index_file", &out.index_file)] {
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a plain file name"
                )));
            }
            if !name.ends_with(".html") {
                return Err(ConfigError::Validation(format!("{key} must end in .html")));
            }
        }
        if out.toc_file == out.index_file {
            return Err(ConfigError::Validation(
                "output.toc_file and output.index_file must differ".into(),
            ));
        }
        if out.assets_dir.is_empty()
            || out.assets_dir.contains('/')
            || out.assets_dir.contains('\\')
            || out.assets_dir == "."
            || out.assets_dir == ".."
        {
            return Err(ConfigError::Validation(
                "output.assets_dir must be a single directory name".into(),
            ));
        }
        if out.assets_dir.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Validation(
                "output.assets_dir must not look like a year directory".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value, if present.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config for an input directory: stock defaults, then `config.toml`.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(dir)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# genson configuration
# =====================
# Place this file as config.toml in the input directory.
# All settings are optional; values shown are the defaults.
# Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Title of the front page (substituted for INSERT_TITLE_HERE).
title = "Blog"

# ---------------------------------------------------------------------------
# Output layout
# ---------------------------------------------------------------------------
[output]
# Write the chronological table of contents.
toc = true

# File names written at the output root.
toc_file = "toc.html"
index_file = "index.html"

# Template assets (CSS, JS, images next to the template) are copied into
# this directory under the output root. TEMPLATE_ROOT, CSS_FILE and JS_FILE
# point here.
assets_dir = "template"

# ---------------------------------------------------------------------------
# Markdown
# ---------------------------------------------------------------------------
[markdown]
# "per-line": every line is converted on its own (lists and multi-line
#             paragraphs render as separate blocks).
# "document": the whole post is converted at once.
mode = "per-line"
"##
}
