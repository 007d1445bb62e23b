//! Renderer - public entry point
//!
//! ```text
//! render("home#items")
//!   -> Address::parse -> ViewCache::get -> CompiledView::execute
//!   -> on failure: ReloadRule? -> ReloadCoordinator::reload -> retry once
//! ```
//!
//! Output is written straight into the caller's writer. A failed first
//! attempt may leave partial output behind before the retry; use
//! `render_to_string` (or buffer yourself) for all-or-nothing output.

mod address;
mod options;


use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

pub use address::Address;
pub use options::{DEFAULT_EXTENSION, DEFAULT_ROOT_NAME, DEFAULT_SEPARATOR, RenderOptions};

use crate::config::RendererConfig;
use crate::error::{LoadError, ReloadResult, RenderError};
use crate::reload::{ReloadCoordinator, ReloadRule, ViewWatcher};
use crate::view::{Loader, ViewCache, ViewSet};

/// Renders views and their fragments, reloading on demand.
pub struct Renderer {
    cache: Arc<ViewCache>,
    coordinator: ReloadCoordinator,
    loader: Arc<Loader>,
    reload_rule: ReloadRule,
    separator: String,
    root_name: String,
}

impl Renderer {
    /// Load every component and view once, then start the reload actor.
    ///
    /// `components` is walked for shared templates; `views` for the views
    /// themselves, which can import any component.
    pub fn new(
        components: impl AsRef<Path>,
        views: impl AsRef<Path>,
        options: RenderOptions,
    ) -> Result<Self, LoadError> {
        let RenderOptions {
            store,
            extension,
            functions,
            reload_rule,
            separator,
            root_name,
        } = options;

        let loader = Arc::new(Loader::new(
            store,
            components.as_ref(),
            views.as_ref(),
            &extension,
            functions,
            root_name.clone(),
        ));
        let initial = loader.load()?;
        crate::debug!("render"; "loaded {} views", initial.len());

        let cache = Arc::new(ViewCache::new(initial));
        let coordinator = ReloadCoordinator::spawn(Arc::clone(&loader), Arc::clone(&cache))?;

        Ok(Self {
            cache,
            coordinator,
            loader,
            reload_rule,
            separator,
            root_name,
        })
    }

    /// Build from a loaded config file, on the local filesystem.
    pub fn from_config(config: &RendererConfig) -> Result<Self, LoadError> {
        Self::new(&config.components, &config.views, config.to_options())
    }

    /// Render `address` (`view` or `view#fragment`) with `data` into `writer`.
    ///
    /// On failure the reload rule decides whether to reload and retry once.
    pub fn render<W, S>(&self, mut writer: W, address: &str, data: S) -> Result<(), RenderError>
    where
        W: Write,
        S: Serialize,
    {
        self.with_retry(address, |address| self.execute(&mut writer, address, &data))
    }

    /// Like `render`, but only returns output from a successful attempt.
    pub fn render_to_string<S: Serialize>(
        &self,
        address: &str,
        data: S,
    ) -> Result<String, RenderError> {
        let mut out = Vec::new();
        self.with_retry(address, |address| {
            out.clear();
            self.execute(&mut out, address, &data)
        })?;
        Ok(into_string(out))
    }

    /// Reload every view now. Joins a reload already in flight.
    pub fn reload(&self) -> ReloadResult {
        self.coordinator.reload()
    }

    /// Reload automatically when template files change on disk.
    pub fn watch(&self) -> notify::Result<ViewWatcher> {
        ViewWatcher::start(
            &[self.loader.components_dir(), self.loader.views_dir()],
            self.loader.extension(),
            self.coordinator.clone(),
        )
    }

    /// Sorted identifiers of the current snapshot.
    pub fn view_names(&self) -> Vec<String> {
        self.cache
            .snapshot()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn snapshot(&self) -> Arc<ViewSet> {
        self.cache.snapshot()
    }

    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Run `attempt`; if the reload rule accepts its error, reload and run it
    /// exactly once more.
    fn with_retry<F>(&self, address: &str, mut attempt: F) -> Result<(), RenderError>
    where
        F: FnMut(Address<'_>) -> Result<(), RenderError>,
    {
        let address = Address::parse(address, &self.separator, &self.root_name);

        let err = match attempt(address) {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };
        if !self.reload_rule.should_reload(&err) {
            return Err(err);
        }

        crate::debug!("render"; "{}: {}, reloading", address, err);
        self.coordinator.reload().map_err(RenderError::Load)?;
        attempt(address)
    }

    fn execute<W, S>(&self, writer: W, address: Address<'_>, data: &S) -> Result<(), RenderError>
    where
        W: Write,
        S: Serialize,
    {
        let view = self.cache.get(address.view)?;
        view.execute(address.fragment, data, writer)
            .map_err(|source| RenderError::Exec {
                view: address.view.to_string(),
                fragment: address.fragment.to_string(),
                source,
            })
    }
}

/// Templates only ever produce UTF-8.
fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
