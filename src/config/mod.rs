//! Renderer configuration from `partview.toml`.
//!
//! # Example
//!
//! ```toml
//! components = "templates/components"   # shared templates, importable by every view
//! views = "templates/views"             # one view per file
//! extension = "html"                    # file filter, leading dot optional
//! separator = "#"                       # address separator: view#fragment
//! root_name = "root"                    # fragment rendered when none is given
//! reload = "not-found"                  # always | not-found | never
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

mod error;

pub use error::ConfigError;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::reload::rule::ReloadPolicy;
use crate::renderer::{DEFAULT_EXTENSION, DEFAULT_ROOT_NAME, DEFAULT_SEPARATOR, RenderOptions};
use crate::view::loader::normalize_extension;

/// Default config file name.
pub const CONFIG_FILE: &str = "partview.toml";

/// File-level renderer settings. Always uses the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub components: PathBuf,
    pub views: PathBuf,
    pub extension: String,
    pub separator: String,
    pub root_name: String,
    pub reload: ReloadPolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            components: PathBuf::from("templates/components"),
            views: PathBuf::from("templates/views"),
            extension: DEFAULT_EXTENSION.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            root_name: DEFAULT_ROOT_NAME.to_string(),
            reload: ReloadPolicy::default(),
        }
    }
}

impl RendererConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        for field in ignored {
            crate::log!("warning"; "unknown config field `{}` ignored", field);
        }
        config.validate()
    }

    /// Load from a file; relative paths resolve against its directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        if let Some(root) = path.parent() {
            config.resolve_paths(root);
        }
        Ok(config)
    }

    /// Make relative directories relative to `root`.
    pub fn resolve_paths(&mut self, root: &Path) {
        if self.components.is_relative() {
            self.components = root.join(&self.components);
        }
        if self.views.is_relative() {
            self.views = root.join(&self.views);
        }
    }

    /// Options for `Renderer::new`, on the local filesystem.
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions::new()
            .with_extension(&self.extension)
            .with_separator(self.separator.clone())
            .with_root_name(self.root_name.clone())
            .with_reload_rule(self.reload.into())
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        if self.root_name.is_empty() {
            return Err(ConfigError::Validation("`root_name` must not be empty".into()));
        }
        self.extension = normalize_extension(&self.extension);
        Ok(self)
    }

    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }
}

/// Find config file by searching upward from `start`
///
/// Returns the first `start/../config_name` that exists.
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}
