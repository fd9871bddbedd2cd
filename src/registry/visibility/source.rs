//! Page visibility signal

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Visibility state reported by the host environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageVisibility {
    Visible,
    Hidden,
}

/// Listener attached to a [`VisibilitySource`]
pub type VisibilityListener = Box<dyn Fn(PageVisibility) + Send + Sync>;

/// Host-provided stream of visibility transitions
pub trait VisibilitySource: Send + Sync {
    /// Attach a listener invoked on every transition
    fn subscribe(&self, listener: VisibilityListener);
}

/// Visibility source driven by explicit [`emit`](ManualVisibility::emit) calls
#[derive(Default)]
pub struct ManualVisibility {
    listeners: Mutex<Vec<VisibilityListener>>,
}

impl ManualVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a transition to every listener, in subscription order
    pub fn emit(&self, visibility: PageVisibility) {
        for listener in self.listeners.lock().iter() {
            listener(visibility);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl std::fmt::Debug for ManualVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualVisibility")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl VisibilitySource for ManualVisibility {
    fn subscribe(&self, listener: VisibilityListener) {
        self.listeners.lock().push(listener);
    }
}
