//! Filesystem watcher that turns template edits into coordinated reloads.
//!
//! ```text
//! notify --> Debounce (quiet period) --> ReloadCoordinator::reload()
//! ```
//!
//! Only meaningful for stores backed by the local filesystem.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::ReloadCoordinator;

pub(crate) const DEBOUNCE_MS: u64 = 300;

/// Keeps a watch alive. Dropping it stops watching.
pub struct ViewWatcher {
    _watcher: RecommendedWatcher,
}

impl ViewWatcher {
    /// Watch `roots` recursively; missing roots are skipped.
    pub fn start(
        roots: &[&Path],
        extension: &str,
        coordinator: ReloadCoordinator,
    ) -> notify::Result<Self> {
        let (tx, rx) = channel::unbounded::<notify::Result<notify::Event>>();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;

        for root in roots {
            if root.exists() {
                watcher.watch(root, RecursiveMode::Recursive)?;
            } else {
                crate::debug!("watch"; "skipping missing root {}", root.display());
            }
        }

        let extension = extension.to_string();
        thread::Builder::new()
            .name("view-watch".into())
            .spawn(move || debounce_loop(rx, &extension, &coordinator))
            .map_err(|e| notify::Error::generic(&e.to_string()))?;

        Ok(Self { _watcher: watcher })
    }
}

/// Collect relevant events and reload once they go quiet.
///
/// Ends when the watcher (and with it the event sender) is dropped.
fn debounce_loop(
    rx: channel::Receiver<notify::Result<notify::Event>>,
    extension: &str,
    coordinator: &ReloadCoordinator,
) {
    let quiet = Duration::from_millis(DEBOUNCE_MS);
    let mut debounce = Debounce::new(quiet);

    loop {
        match rx.recv_timeout(quiet) {
            Ok(Ok(event)) => {
                if is_relevant(&event, extension) {
                    crate::debug!("watch"; "{:?} {:?}", event.kind, event.paths);
                    debounce.touch(Instant::now());
                }
            }
            Ok(Err(e)) => crate::log!("watch"; "notify error: {}", e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if debounce.take_if_ready(Instant::now()) {
            match coordinator.reload() {
                Ok(()) => crate::debug!("watch"; "views reloaded"),
                Err(e) => crate::log!("error"; "reload failed: {}", e),
            }
        }
    }
}

/// Pure timing: time of the last relevant event, if one is pending.
#[derive(Debug)]
struct Debounce {
    quiet: Duration,
    last_event: Option<Instant>,
}

impl Debounce {
    fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_event: None,
        }
    }

    fn touch(&mut self, now: Instant) {
        self.last_event = Some(now);
    }

    /// True once, after a quiet period following at least one event.
    fn take_if_ready(&mut self, now: Instant) -> bool {
        match self.last_event {
            Some(last) if now.duration_since(last) >= self.quiet => {
                self.last_event = None;
                true
            }
            _ => false,
        }
    }
}

/// Create/remove/data-modify of a template file.
fn is_relevant(event: &notify::Event, extension: &str) -> bool {
    let kind_matches = match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        // Metadata-only changes (mtime/chmod noise) never change a template
        EventKind::Modify(modify) => !matches!(modify, notify::event::ModifyKind::Metadata(_)),
        _ => false,
    };
    kind_matches && event.paths.iter().any(|p| is_template_path(p, extension))
}

fn is_template_path(path: &Path, extension: &str) -> bool {
    !is_temp_file(path) && crate::store::has_extension(path, extension)
}

/// Editor swap/backup files.
fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with(".#") || name.ends_with('~') || name.ends_with(".swp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_event(paths: Vec<&str>, kind: EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: paths.into_iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    fn modify_kind() -> EventKind {
        EventKind::Modify(notify::event::ModifyKind::Data(
            notify::event::DataChange::Any,
        ))
    }

    #[test]
    fn test_relevant_events() {
        let create = EventKind::Create(notify::event::CreateKind::File);
        let remove = EventKind::Remove(notify::event::RemoveKind::File);
        let metadata = EventKind::Modify(notify::event::ModifyKind::Metadata(
            notify::event::MetadataKind::WriteTime,
        ));

        assert!(is_relevant(&make_event(vec!["/v/home.html"], create), ".html"));
        assert!(is_relevant(&make_event(vec!["/v/home.html"], remove), ".html"));
        assert!(is_relevant(&make_event(vec!["/v/home.html"], modify_kind()), ".html"));
        assert!(!is_relevant(&make_event(vec!["/v/home.html"], metadata), ".html"));
        assert!(!is_relevant(&make_event(vec!["/v/notes.txt"], modify_kind()), ".html"));
        assert!(!is_relevant(&make_event(vec!["/v/.#home.html"], modify_kind()), ".html"));
        assert!(!is_relevant(
            &make_event(vec!["/v/home.html"], EventKind::Access(notify::event::AccessKind::Any)),
            ".html"
        ));
    }

    #[test]
    fn test_debounce_waits_for_quiet() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(DEBOUNCE_MS));
        assert!(!debounce.take_if_ready(start));

        debounce.touch(start);
        assert!(!debounce.take_if_ready(start + Duration::from_millis(100)));

        // Another event restarts the quiet period
        debounce.touch(start + Duration::from_millis(200));
        assert!(!debounce.take_if_ready(start + Duration::from_millis(400)));
        assert!(debounce.take_if_ready(start + Duration::from_millis(500)));

        // Fires once per burst
        assert!(!debounce.take_if_ready(start + Duration::from_millis(900)));
    }
}
