use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{collect::CommentTag, keywords::KeywordSpec};

pub const CONFIG_FILE_NAME: &str = ".pyglotrc.json";

/// `commentTag` in the config file: a tag string, `true` for every comment,
/// `false` for none.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CommentTagSetting {
    Enabled(bool),
    Tag(String),
}

impl Default for CommentTagSetting {
    fn default() -> Self {
        CommentTagSetting::Enabled(false)
    }
}

impl From<&CommentTagSetting> for CommentTag {
    fn from(setting: &CommentTagSetting) -> Self {
        match setting {
            CommentTagSetting::Enabled(false) => CommentTag::Disabled,
            CommentTagSetting::Enabled(true) => CommentTag::All,
            CommentTagSetting::Tag(tag) if tag.is_empty() => CommentTag::All,
            CommentTagSetting::Tag(tag) => CommentTag::Tagged(tag.clone()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    /// Extra keyword specifications, added to the built-in table.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub comment_tag: CommentTagSetting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_domain: Option<String>,
}

fn default_includes() -> Vec<String> {
    vec![".".to_string()]
}

fn default_ignores() -> Vec<String> {
    ["**/.venv/**", "**/venv/**", "**/.tox/**", "**/node_modules/**"]
        .map(String::from)
        .to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: default_ignores(),
            includes: default_includes(),
            keywords: Vec::new(),
            comment_tag: CommentTagSetting::default(),
            domain: None,
            default_domain: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores` or `includes` is
    /// invalid, or if a keyword specification cannot be parsed.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal paths, so `[id]` needs no escaping.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for spec in &self.keywords {
            KeywordSpec::parse(spec)
                .with_context(|| format!("Invalid keyword in 'keywords': \"{}\"", spec))?;
        }

        Ok(())
    }

    pub fn comment_tag(&self) -> CommentTag {
        CommentTag::from(&self.comment_tag)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
