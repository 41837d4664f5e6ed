//! Imperative navigation seam.
//!
//! The routing table lives in the rendering host; the state layer only ever
//! asks it to go somewhere, with a small fixed set of literal paths.

/// Imperative "go to route" collaborator.
pub trait Navigator: Send + Sync {
    /// Navigate to the given route.
    fn push(&self, route: &str);
}

/// Production stand-in for a headless process: records the intent in the
/// log. The rendering host installs its router-backed implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn push(&self, route: &str) {
        tracing::info!(route, "Navigation requested");
    }
}
