//! Cache invalidation registry
//!
//! The action catalog, the dispatcher that maps actions to cache clears, the
//! visibility-driven staleness sweep, and the audit trail behind both.

pub mod audit;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod debug;
pub mod dispatch;
pub mod error;
pub mod session;
pub mod store;
pub mod visibility;

pub use audit::{AuditEvent, AuditLog, AuditStats};
pub use catalog::{Action, ActionDomain};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BuildMode, RegistryConfig};
pub use debug::{DebugHandle, debug_handle, disable_cache_debugging, enable_cache_debugging};
pub use dispatch::patterns::{ClearScope, FULL_CLEAR_SENTINEL, lookup_patterns};
pub use dispatch::{
    AuditReport, CacheState, DispatchCounters, InvalidateOptions, InvalidationDispatcher,
    action_types,
};
pub use error::{RegistryError, RegistryResult};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use store::{CacheStore, CachedResponse, ClearCall, ClearRecorder, ResponseCache};
pub use visibility::{
    ManualVisibility, PageVisibility, StalenessThresholds, StalenessTier, SweepOutcome,
    VisibilityOptions, VisibilityRegistration, VisibilitySource, VisibilityWatcher,
};
