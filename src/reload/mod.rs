//! Reload Module
//!
//! Coordinated hot reload of the view snapshot.
//!
//! # Architecture
//!
//! ```text
//! Renderer / ViewWatcher --reload()--> Coordinator --load--> Loader
//!                                          |
//!                                          +--publish--> ViewCache
//! ```
//!
//! # Modules
//!
//! - `coordinator` - single-flight reload actor
//! - `rule` - when a failed render should trigger a reload
//! - `watch` - filesystem watcher feeding the coordinator

pub mod coordinator;
pub mod rule;
pub mod watch;

pub use coordinator::ReloadCoordinator;
pub use rule::ReloadRule;
pub use watch::ViewWatcher;
