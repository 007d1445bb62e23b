//! Loader pass: component tree + view tree -> `ViewSet`.
//!
//! Every pass starts from scratch. Components go into one shared
//! environment; each view is parsed into its own clone of it, so every view
//! can import every component and views never see each other.

use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::{AutoEscape, Environment};
use rustc_hash::FxHashMap;

use super::{CompiledView, Functions, ViewSet};
use crate::error::LoadError;
use crate::store::FileStore;

/// Everything a loader pass needs. Cheap to share across threads.
pub struct Loader {
    store: Arc<dyn FileStore>,
    components: PathBuf,
    views: PathBuf,
    extension: String,
    functions: Functions,
    root_name: String,
}

impl Loader {
    pub fn new(
        store: Arc<dyn FileStore>,
        components: impl Into<PathBuf>,
        views: impl Into<PathBuf>,
        extension: &str,
        functions: Functions,
        root_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            components: components.into(),
            views: views.into(),
            extension: normalize_extension(extension),
            functions,
            root_name: root_name.into(),
        }
    }

    pub fn components_dir(&self) -> &Path {
        &self.components
    }

    pub fn views_dir(&self) -> &Path {
        &self.views
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Run one full pass. Never returns a partial set.
    pub fn load(&self) -> Result<ViewSet, LoadError> {
        let components = self.load_components()?;

        let mut views = ViewSet::new();
        let mut seen: FxHashMap<String, PathBuf> = FxHashMap::default();
        for path in self.list(&self.views)? {
            let Some(id) = view_id(&self.views, &path, &self.extension) else {
                continue;
            };
            match seen.entry(id.clone()) {
                Entry::Occupied(first) => {
                    return Err(LoadError::Duplicate {
                        id,
                        first: first.get().clone(),
                        second: path,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(path.clone());
                }
            }

            let source = self.read(&path)?;
            let mut env = components.clone();
            env.add_template_owned(id.clone(), source)
                .map_err(|source| LoadError::Parse {
                    path: path.clone(),
                    source,
                })?;
            views.insert(CompiledView::new(env, id, self.root_name.clone(), path));
        }

        crate::debug!("load"; "{} views from {}", views.len(), self.views.display());
        Ok(views)
    }

    fn load_components(&self) -> Result<Environment<'static>, LoadError> {
        let mut env = Environment::new();
        let escape = auto_escape_for(&self.extension);
        env.set_auto_escape_callback(move |_| escape);
        for (name, value) in &self.functions {
            env.add_global(name.clone(), value.clone());
        }

        let mut count = 0usize;
        for path in self.list(&self.components)? {
            let Some(name) = relative_name(&self.components, &path) else {
                continue;
            };
            let source = self.read(&path)?;
            env.add_template_owned(name, source)
                .map_err(|source| LoadError::Parse {
                    path: path.clone(),
                    source,
                })?;
            count += 1;
        }

        crate::debug!("load"; "{} components from {}", count, self.components.display());
        Ok(env)
    }

    fn list(&self, root: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let mut files = self
            .store
            .list(root, &self.extension)
            .map_err(|source| LoadError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<String, LoadError> {
        self.store.read(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Ensure a non-empty extension starts with a dot.
pub fn normalize_extension(ext: &str) -> String {
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// View identifiers carry no extension, so escaping follows the configured
/// extension instead of each template name.
fn auto_escape_for(extension: &str) -> AutoEscape {
    let ext = extension.rsplit('.').next().unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" | "xml" | "svg" => AutoEscape::Html,
        _ => AutoEscape::None,
    }
}

/// Path relative to `root`, components joined with `/`.
fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// View identifier: relative name with the extension stripped.
fn view_id(root: &Path, path: &Path, extension: &str) -> Option<String> {
    let name = relative_name(root, path)?;
    let id = name.strip_suffix(extension).unwrap_or(&name);
    if id.is_empty() || id.ends_with('/') {
        return None;
    }
    Some(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::io;

    fn loader(store: Arc<dyn FileStore>) -> Loader {
        Loader::new(store, "components", "views", "html", Functions::new(), "root")
    }

    fn render(set: &ViewSet, name: &str, fragment: &str) -> String {
        let mut out = Vec::new();
        set.get(name)
            .unwrap()
            .execute(fragment, minijinja::context! {}, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("html"), ".html");
        assert_eq!(normalize_extension(".html"), ".html");
        assert_eq!(normalize_extension("tmpl.html"), ".tmpl.html");
        assert_eq!(normalize_extension(""), "");
    }

    #[test]
    fn test_auto_escape_follows_extension() {
        assert_eq!(auto_escape_for(".html"), AutoEscape::Html);
        assert_eq!(auto_escape_for(".tmpl.HTML"), AutoEscape::Html);
        assert_eq!(auto_escape_for(".txt"), AutoEscape::None);
        assert_eq!(auto_escape_for(""), AutoEscape::None);
    }

    #[test]
    fn test_view_id() {
        let root = Path::new("views");
        assert_eq!(
            view_id(root, Path::new("views/home.html"), ".html").as_deref(),
            Some("home")
        );
        assert_eq!(
            view_id(root, Path::new("views/blog/post.html"), ".html").as_deref(),
            Some("blog/post")
        );
        assert_eq!(view_id(root, Path::new("views/.html"), ".html"), None);
        assert_eq!(view_id(root, Path::new("other/home.html"), ".html"), None);
    }

    #[test]
    fn test_views_see_components() {
        let store = Arc::new(MemoryStore::new());
        store.insert(
            "components/button.html",
            r#"{% macro btn(label) %}<button>{{ label }}</button>{% endmacro %}"#,
        );
        store.insert(
            "views/home.html",
            r#"{% from "button.html" import btn %}<main>{{ btn("Go") }}</main>"#,
        );
        store.insert("views/blog/post.html", "{% block body %}post{% endblock %}");

        let set = loader(store).load().unwrap();
        assert_eq!(set.names(), vec!["blog/post", "home"]);
        assert_eq!(render(&set, "home", "root"), "<main><button>Go</button></main>");
        assert_eq!(render(&set, "blog/post", "body"), "post");
    }

    #[test]
    fn test_views_are_isolated() {
        let store = Arc::new(MemoryStore::new());
        store.insert("views/a.html", "a");
        store.insert("views/b.html", r#"{% include "a" %}"#);

        let set = loader(store).load().unwrap();
        let mut out = Vec::new();
        let err = set
            .get("b")
            .unwrap()
            .execute("root", minijinja::context! {}, &mut out);
        assert!(err.is_err());
    }

    #[test]
    fn test_functions_are_bound() {
        let store = Arc::new(MemoryStore::new());
        store.insert("views/shout.html", "{{ upper('hey') }}");

        let mut functions = Functions::new();
        functions.insert(
            "upper".into(),
            minijinja::Value::from_function(|s: String| s.to_uppercase()),
        );
        let loader = Loader::new(store, "components", "views", ".html", functions, "root");

        let set = loader.load().unwrap();
        assert_eq!(render(&set, "shout", "root"), "HEY");
    }

    #[test]
    fn test_parse_error_names_path() {
        let store = Arc::new(MemoryStore::new());
        store.insert("views/good.html", "ok");
        store.insert("views/bad.html", "{% if %}");

        let err = loader(store).load().unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert_eq!(err.path(), Some(Path::new("views/bad.html")));
    }

    #[test]
    fn test_component_parse_error_aborts() {
        let store = Arc::new(MemoryStore::new());
        store.insert("components/broken.html", "{{ unclosed");
        store.insert("views/home.html", "ok");

        let err = loader(store).load().unwrap_err();
        assert_eq!(err.path(), Some(Path::new("components/broken.html")));
    }

    /// Store that reports the same view twice.
    struct DoubledStore;

    impl FileStore for DoubledStore {
        fn list(&self, root: &Path, _extension: &str) -> io::Result<Vec<PathBuf>> {
            if root == Path::new("views") {
                Ok(vec![
                    PathBuf::from("views/home.html"),
                    PathBuf::from("views/home.html"),
                ])
            } else {
                Ok(Vec::new())
            }
        }

        fn read(&self, _path: &Path) -> io::Result<String> {
            Ok("home".into())
        }
    }

    #[test]
    fn test_duplicate_view_is_error() {
        let err = loader(Arc::new(DoubledStore)).load().unwrap_err();
        match err {
            LoadError::Duplicate { id, .. } => assert_eq!(id, "home"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_views_dir() {
        let set = loader(Arc::new(MemoryStore::new())).load().unwrap();
        assert!(set.is_empty());
    }
}
