//! Partview - views, partials and shared components with coalesced hot reload.
//!
//! A view is one template file; its whole document is the root fragment and
//! every `{% block %}` in it is a named fragment, addressed as `view#block`.
//! Components are templates every view can import.
//!
//! ```no_run
//! use partview::{RenderOptions, Renderer};
//!
//! let renderer = Renderer::new("templates/components", "templates/views", RenderOptions::default())?;
//! let html = renderer.render_to_string("home#items", minijinja::context! { items => ["a", "b"] })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod logger;

pub mod config;
pub mod error;
pub mod reload;
pub mod renderer;
pub mod store;
pub mod view;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, RendererConfig};
pub use error::{LoadError, ReloadResult, RenderError};
pub use reload::{ReloadRule, ViewWatcher};
pub use renderer::{Address, RenderOptions, Renderer};
pub use store::{FileStore, MemoryStore, OsStore};
pub use view::{CompiledView, Functions, ViewSet};
