//! Error types for loading and rendering views.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

// ============================================================================
// LoadError
// ============================================================================

/// A failed loader pass. Identifies the offending path where there is one.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to walk `{}`", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    #[error("view `{id}` is defined by both `{}` and `{}`", first.display(), second.display())]
    Duplicate {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to start loader thread")]
    Spawn(#[source] io::Error),

    #[error("loader pass panicked")]
    Panicked,

    #[error("reload coordinator has stopped")]
    Stopped,
}

impl LoadError {
    /// The file or directory this error is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Walk { path, .. } | Self::Read { path, .. } | Self::Parse { path, .. } => {
                Some(path)
            }
            Self::Duplicate { second, .. } => Some(second),
            Self::Spawn(_) | Self::Panicked | Self::Stopped => None,
        }
    }
}

/// Outcome of one reload batch, shared verbatim by every waiter.
pub type ReloadResult = Result<(), Arc<LoadError>>;

// ============================================================================
// RenderError
// ============================================================================

/// A failed render call.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("view `{0}` not found")]
    NotFound(String),

    #[error("failed to execute `{view}` fragment `{fragment}`")]
    Exec {
        view: String,
        fragment: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("reload failed")]
    Load(#[source] Arc<LoadError>),
}

impl RenderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_exec(&self) -> bool {
        matches!(self, Self::Exec { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io::ErrorKind;

    #[test]
    fn test_load_error_names_path() {
        let err = LoadError::Read {
            path: PathBuf::from("views/home.html"),
            source: io::Error::new(ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("views/home.html"));
        assert_eq!(err.path(), Some(std::path::Path::new("views/home.html")));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_duplicate_display() {
        let err = LoadError::Duplicate {
            id: "home".into(),
            first: PathBuf::from("a/home.html"),
            second: PathBuf::from("b/home.html"),
        };
        let display = err.to_string();
        assert!(display.contains("`home`"));
        assert!(display.contains("a/home.html"));
        assert!(display.contains("b/home.html"));
    }

    #[test]
    fn test_render_error_kinds() {
        assert!(RenderError::NotFound("x".into()).is_not_found());
        assert!(!RenderError::Load(Arc::new(LoadError::Stopped)).is_not_found());
        assert_eq!(
            RenderError::NotFound("blog/post".into()).to_string(),
            "view `blog/post` not found"
        );
    }
}
