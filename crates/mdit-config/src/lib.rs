//! Configuration management for mdit plugins.
//!
//! Parses `mdit.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [markdown]
//! gfm = true
//!
//! [tex]
//! math_fence = true
//!
//! [[stylize]]
//! matcher = "MUST"
//! tags = ["strong", "em"]
//! attrs = { class = "badge tip" }
//!
//! [[stylize]]
//! pattern = "^(?:MUST|SHALL) NOT$"
//! tag = "span"
//! attrs = { class = "badge danger" }
//! ```
//!
//! Stylize rules from the file are declarative: they set a tag, merge
//! attributes and replace content. Rules that need code are added with
//! [`mdit_stylize::StylizeRule::new`]. The tex render function is always
//! supplied by the caller, see [`Config::tex`].

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use mdit_renderer::{MarkdownRenderer, RenderEnv};
use mdit_stylize::{Matcher, Replacement, Stylize, StylizeRule};
use mdit_tex::Tex;
use regex::Regex;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdit.toml";

/// Tags a stylize rule may target.
const STYLIZE_TAGS: [&str; 2] = ["em", "strong"];

/// Plugin configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown parsing options.
    pub markdown: MarkdownConfig,
    /// Tex delegate options.
    pub tex: TexConfig,
    /// Declarative stylize rules in priority order.
    pub stylize: Vec<StylizeRuleConfig>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown parsing options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Whether GitHub Flavored Markdown extensions are enabled.
    pub gfm: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Tex delegate options.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TexConfig {
    /// Render `math` fences as display math.
    pub math_fence: bool,
}

/// One declarative stylize rule.
///
/// Exactly one of `matcher` and `pattern` must be set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StylizeRuleConfig {
    /// Exact text to match.
    pub matcher: Option<String>,
    /// Regular expression to match.
    pub pattern: Option<String>,
    /// Tags the rule applies to (`em`, `strong`). Empty means both.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Replacement tag.
    pub tag: Option<String>,
    /// Attributes merged over the node's attributes.
    #[serde(default)]
    pub attrs: IndexMap<String, String>,
    /// Replacement content; `{content}` expands to the original text.
    pub content: Option<String>,
}

impl StylizeRuleConfig {
    /// Validate the rule and build its matcher.
    fn matcher(&self, index: usize) -> Result<Matcher, ConfigError> {
        let field = |name: &str| format!("stylize[{index}].{name}");

        let matcher = match (&self.matcher, &self.pattern) {
            (Some(text), None) => {
                require_non_empty(text, &field("matcher"))?;
                Matcher::Exact(text.clone())
            }
            (None, Some(pattern)) => {
                require_non_empty(pattern, &field("pattern"))?;
                let regex = Regex::new(pattern).map_err(|source| ConfigError::Pattern {
                    field: field("pattern"),
                    source,
                })?;
                Matcher::Pattern(regex)
            }
            (Some(_), Some(_)) => {
                return Err(ConfigError::Validation(format!(
                    "stylize[{index}] cannot set both matcher and pattern"
                )));
            }
            (None, None) => {
                return Err(ConfigError::Validation(format!(
                    "stylize[{index}] requires matcher or pattern"
                )));
            }
        };

        for tag in &self.tags {
            if !STYLIZE_TAGS.contains(&tag.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "{} must only contain \"em\" or \"strong\", got \"{tag}\"",
                    field("tags")
                )));
            }
        }
        if let Some(tag) = &self.tag {
            require_non_empty(tag, &field("tag"))?;
        }

        Ok(matcher)
    }

    fn replacement(&self) -> Replacement {
        Replacement {
            tags: self.tags.clone(),
            tag: self.tag.clone(),
            attrs: self.attrs.clone(),
            content: self.content.clone(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Invalid regular expression in a stylize rule.
    #[error("Invalid pattern in {field}: {source}")]
    Pattern {
        /// Config field path (e.g., "`stylize[0].pattern`").
        field: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdit.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(
            path = %path.display(),
            rules = config.stylize.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`] and [`Config::from_toml`].
    ///
    /// # Errors
    ///
    /// Returns the first invalid stylize rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, rule) in self.stylize.iter().enumerate() {
            rule.matcher(index)?;
        }
        Ok(())
    }

    /// Build the configured stylize rules in file order.
    ///
    /// # Errors
    ///
    /// Returns error if a rule is invalid.
    pub fn stylize_rules(&self) -> Result<Vec<StylizeRule>, ConfigError> {
        self.stylize
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Ok(StylizeRule::declarative(
                    rule.matcher(index)?,
                    rule.replacement(),
                ))
            })
            .collect()
    }

    /// Build the stylize processor from the configured rules.
    ///
    /// # Errors
    ///
    /// Returns error if a rule is invalid.
    pub fn stylize(&self) -> Result<Stylize, ConfigError> {
        Ok(Stylize::new(self.stylize_rules()?))
    }

    /// Build the tex delegate with configured options and the given render function.
    pub fn tex<F>(&self, render: F) -> Tex
    where
        F: Fn(&str, bool, &RenderEnv) -> String + Send + Sync + 'static,
    {
        Tex::new(render).with_math_fence(self.tex.math_fence)
    }

    /// Build a renderer with configured markdown options and stylize rules.
    ///
    /// Add a math processor with
    /// [`MarkdownRenderer::with_math_processor`] and [`Config::tex`].
    ///
    /// # Errors
    ///
    /// Returns error if a stylize rule is invalid.
    pub fn renderer(&self) -> Result<MarkdownRenderer, ConfigError> {
        Ok(MarkdownRenderer::new()
            .with_gfm(self.markdown.gfm)
            .with_inline_processor(self.stylize()?))
    }
}

/// Search for config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
