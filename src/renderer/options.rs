//! Renderer options with documented defaults.
//!
//! | option      | default            |
//! |-------------|--------------------|
//! | store       | `OsStore`          |
//! | extension   | `.html`            |
//! | functions   | none               |
//! | reload_rule | `OnNotFound`       |
//! | separator   | `#`                |
//! | root_name   | `root`             |

use std::sync::Arc;

use crate::reload::ReloadRule;
use crate::store::{FileStore, OsStore};
use crate::view::Functions;
use crate::view::loader::normalize_extension;

pub const DEFAULT_EXTENSION: &str = ".html";
pub const DEFAULT_SEPARATOR: &str = "#";
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Optional knobs for `Renderer::new`.
#[derive(Clone)]
pub struct RenderOptions {
    pub store: Arc<dyn FileStore>,
    pub extension: String,
    pub functions: Functions,
    pub reload_rule: ReloadRule,
    pub separator: String,
    pub root_name: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            store: Arc::new(OsStore),
            extension: DEFAULT_EXTENSION.to_string(),
            functions: Functions::new(),
            reload_rule: ReloadRule::default(),
            separator: DEFAULT_SEPARATOR.to_string(),
            root_name: DEFAULT_ROOT_NAME.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an alternate file store.
    pub fn with_store(mut self, store: Arc<dyn FileStore>) -> Self {
        self.store = store;
        self
    }

    /// Filter template files by this extension; a leading dot is added if missing.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = normalize_extension(extension);
        self
    }

    /// Bind a value (usually `Value::from_function`) under `name` in every template.
    pub fn with_function(mut self, name: impl Into<String>, value: minijinja::Value) -> Self {
        self.functions.insert(name.into(), value);
        self
    }

    pub fn with_functions(mut self, functions: Functions) -> Self {
        self.functions.extend(functions);
        self
    }

    pub fn with_reload_rule(mut self, rule: ReloadRule) -> Self {
        self.reload_rule = rule;
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Self {
        self.root_name = root_name.into();
        self
    }
}
