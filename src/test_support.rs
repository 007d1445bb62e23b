//! Shared fixtures for unit tests.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::store::{FileStore, MemoryStore};

pub const BUTTON: &str =
    r#"{% macro btn(label) %}<button class="btn">{{ label }}</button>{% endmacro %}"#;

pub const HOME: &str = r#"{% from "button.html" import btn %}<main><h1>{{ title }}</h1>{{ btn("Go") }}{% block items %}<ul>{% for item in items %}<li>{{ item }}</li>{% endfor %}</ul>{% endblock %}</main>"#;

/// `components/button.html` and `views/home.html`.
pub fn memory_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.insert("components/button.html", BUTTON);
    store.insert("views/home.html", HOME);
    store
}

/// Store wrapper that counts view-tree walks and stalls each one.
pub struct SlowStore {
    inner: Arc<dyn FileStore>,
    delay: Duration,
    view_passes: AtomicUsize,
}

impl SlowStore {
    pub fn new(inner: Arc<dyn FileStore>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            view_passes: AtomicUsize::new(0),
        }
    }

    /// Number of loader passes that reached the views tree.
    pub fn view_passes(&self) -> usize {
        self.view_passes.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.view_passes.store(0, Ordering::SeqCst);
    }
}

impl FileStore for SlowStore {
    fn list(&self, root: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
        if root.ends_with("views") {
            self.view_passes.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
        }
        self.inner.list(root, extension)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.inner.read(path)
    }
}
