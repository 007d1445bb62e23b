//! Reload rules: which render failures are worth a reload-and-retry.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Predicate over a failed render.
#[derive(Clone, Default)]
pub enum ReloadRule {
    /// Reload on every failure.
    Always,
    /// Reload only when the view is unknown.
    #[default]
    OnNotFound,
    /// Never reload.
    Never,
    Custom(Arc<dyn Fn(&RenderError) -> bool + Send + Sync>),
}

impl ReloadRule {
    pub fn custom(rule: impl Fn(&RenderError) -> bool + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(rule))
    }

    pub fn should_reload(&self, err: &RenderError) -> bool {
        match self {
            Self::Always => true,
            Self::OnNotFound => err.is_not_found(),
            Self::Never => false,
            Self::Custom(rule) => rule(err),
        }
    }
}

impl fmt::Debug for ReloadRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::OnNotFound => f.write_str("OnNotFound"),
            Self::Never => f.write_str("Never"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Config-file spelling of the built-in rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReloadPolicy {
    Always,
    #[default]
    NotFound,
    Never,
}

impl From<ReloadPolicy> for ReloadRule {
    fn from(policy: ReloadPolicy) -> Self {
        match policy {
            ReloadPolicy::Always => Self::Always,
            ReloadPolicy::NotFound => Self::OnNotFound,
            ReloadPolicy::Never => Self::Never,
        }
    }
}
