//! Compiled views and immutable view snapshots.
//!
//! # Modules
//!
//! - `loader` - walks the component and view trees into a `ViewSet`
//! - `cache` - holds the published `ViewSet` behind an atomic swap

pub mod cache;
pub mod loader;

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::{Environment, Error};
use rustc_hash::FxHashMap;
use serde::Serialize;

pub use cache::ViewCache;
pub use loader::Loader;

/// Function bindings made available to every component and view.
///
/// Build values with `minijinja::Value::from_function`.
pub type Functions = BTreeMap<String, minijinja::Value>;

// =============================================================================
// CompiledView
// =============================================================================

/// One parsed view, together with the component set it was cloned from.
///
/// The whole document is the root fragment; every `{% block %}` in the view
/// is a named fragment.
#[derive(Debug)]
pub struct CompiledView {
    env: Environment<'static>,
    name: String,
    root_name: String,
    source: PathBuf,
}

impl CompiledView {
    pub(crate) fn new(
        env: Environment<'static>,
        name: String,
        root_name: String,
        source: PathBuf,
    ) -> Self {
        Self {
            env,
            name,
            root_name,
            source,
        }
    }

    /// View identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the view was parsed from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Execute `fragment` against `data`, writing into `writer`.
    ///
    /// A named fragment runs the view's top level first with its output
    /// discarded, so blocks see top-level imports and `set` variables. An
    /// error anywhere in that top level fails the fragment as well.
    pub fn execute<S, W>(&self, fragment: &str, data: S, mut writer: W) -> Result<(), Error>
    where
        S: Serialize,
        W: Write,
    {
        let tmpl = self.env.get_template(&self.name)?;
        if fragment == self.root_name {
            tmpl.render_captured_to(data, writer)?;
            return Ok(());
        }

        let mut captured = tmpl.render_captured_to(data, io::sink())?;
        captured.with_state_mut(|state| state.render_block_to_write(fragment, &mut writer))
    }
}

// =============================================================================
// ViewSet
// =============================================================================

/// Immutable mapping from view identifier to compiled view.
#[derive(Debug, Default)]
pub struct ViewSet {
    views: FxHashMap<String, Arc<CompiledView>>,
    generation: u64,
}

impl ViewSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<CompiledView>> {
        self.views.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    /// Sorted view identifiers.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.views.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Publish counter: 0 for the startup snapshot, +1 per successful reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    pub(crate) fn insert(&mut self, view: CompiledView) {
        self.views.insert(view.name.clone(), Arc::new(view));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(name: &str, source: &str) -> CompiledView {
        let mut env = Environment::new();
        env.add_template_owned(name.to_string(), source.to_string())
            .unwrap();
        CompiledView::new(env, name.into(), "root".into(), PathBuf::from(name))
    }

    fn exec(view: &CompiledView, fragment: &str) -> Result<String, Error> {
        let mut out = Vec::new();
        view.execute(fragment, minijinja::context! { who => "world" }, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_root_renders_whole_document() {
        let v = view("page", "<h1>{{ who }}</h1>{% block list %}<ul></ul>{% endblock %}");
        assert_eq!(exec(&v, "root").unwrap(), "<h1>world</h1><ul></ul>");
    }

    #[test]
    fn test_named_fragment_renders_only_block() {
        let v = view("page", "<h1>x</h1>{% block list %}<li>{{ who }}</li>{% endblock %}");
        assert_eq!(exec(&v, "list").unwrap(), "<li>world</li>");
    }

    #[test]
    fn test_fragment_sees_top_level_set() {
        let v = view("page", "{% set greeting = 'hi ' ~ who %}{% block msg %}{{ greeting }}{% endblock %}");
        assert_eq!(exec(&v, "msg").unwrap(), "hi world");
    }

    #[test]
    fn test_fragment_fails_when_top_level_fails() {
        let v = view("page", "{{ user.name }}{% block items %}<li>{{ who }}</li>{% endblock %}");
        assert!(exec(&v, "root").is_err());
        assert!(exec(&v, "items").is_err());
    }

    #[test]
    fn test_empty_fragment_fails() {
        let v = view("page", "{% block items %}x{% endblock %}");
        assert!(exec(&v, "").is_err());
    }

    #[test]
    fn test_unknown_fragment_fails() {
        let v = view("page", "<h1>x</h1>");
        assert!(exec(&v, "missing").is_err());
    }

    #[test]
    fn test_view_set_names_sorted() {
        let mut set = ViewSet::new();
        set.insert(view("zeta", ""));
        set.insert(view("alpha", ""));
        set.insert(view("blog/post", ""));

        assert_eq!(set.names(), vec!["alpha", "blog/post", "zeta"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains("blog/post"));
        assert_eq!(set.generation(), 0);
        assert_eq!(set.get("alpha").unwrap().source(), Path::new("alpha"));
    }
}
