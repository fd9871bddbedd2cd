//! cachebust prelude - convenient imports for users
//!
//! Everything a host needs to build a registry and wire it to its cache,
//! session storage and visibility events.

// Re-export the public API
pub use crate::cachebust::{CacheBust, CacheBustBuilder};

// Catalog and dispatch options
pub use crate::registry::catalog::{Action, ActionDomain};
pub use crate::registry::dispatch::InvalidateOptions;

// Error types
pub use crate::registry::error::{RegistryError, RegistryResult};

// Configuration
pub use crate::registry::config::{BuildMode, RegistryConfig};
pub use crate::registry::visibility::{StalenessThresholds, StalenessTier};

// Traits hosts implement, with the bundled implementations
pub use crate::registry::clock::{Clock, SystemClock};
pub use crate::registry::session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use crate::registry::store::{CacheStore, ResponseCache};
pub use crate::registry::visibility::{
    PageVisibility, VisibilityOptions, VisibilityRegistration, VisibilitySource,
};

// Debug namespace
pub use crate::registry::debug::{DebugHandle, disable_cache_debugging, enable_cache_debugging};
