//! Navigation and user-notification adapters.
//!
//! The workflow never draws anything itself. It tells a `Navigator` which
//! view to show next and hands user-facing messages to a `Notifier`.

use crate::navigation::Route;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Switches the visible view.
pub trait Navigator: Send + Sync {
    /// Transitions to `route`.
    fn navigate(&self, route: Route);
}

/// Shows blocking messages to the user.
pub trait Notifier: Send + Sync {
    /// Shows `message` to the user.
    fn alert(&self, message: &str);
}

/// Buffered navigator and notifier.
///
/// Records every navigation and alert so the host (a terminal frontend or
/// a test) can display or inspect them after the workflow returns. Clones
/// share the same buffers.
#[derive(Debug, Clone, Default)]
pub struct SessionUi {
    routes: Arc<Mutex<Vec<Route>>>,
    alerts: Arc<Mutex<Vec<String>>>,
}

impl SessionUi {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent navigation target, if any.
    pub fn current_route(&self) -> Option<Route> {
        lock(&self.routes).last().copied()
    }

    /// Every navigation target in order.
    pub fn routes(&self) -> Vec<Route> {
        lock(&self.routes).clone()
    }

    /// Every alert shown so far.
    pub fn alerts(&self) -> Vec<String> {
        lock(&self.alerts).clone()
    }

    /// Removes and returns recorded navigations.
    pub fn take_routes(&self) -> Vec<Route> {
        std::mem::take(&mut *lock(&self.routes))
    }

    /// Removes and returns pending alerts.
    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.alerts))
    }
}

impl Navigator for SessionUi {
    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "navigating");
        lock(&self.routes).push(route);
    }
}

impl Notifier for SessionUi {
    fn alert(&self, message: &str) {
        lock(&self.alerts).push(message.to_string());
    }
}

fn lock<T>(buffer: &Mutex<T>) -> MutexGuard<'_, T> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}
