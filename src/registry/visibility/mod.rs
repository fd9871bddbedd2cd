//! Visibility-driven staleness handling
//!
//! Lifecycle: the watcher starts uninitialized and moves to watching on the
//! first `init`; there is no way back. While watching, hidden transitions only
//! record a timestamp and visible transitions run the tiered sweep.

pub mod source;
pub mod tiers;
pub mod watcher;

pub use source::{ManualVisibility, PageVisibility, VisibilityListener, VisibilitySource};
pub use tiers::{StalenessThresholds, StalenessTier};
pub use watcher::{
    StaleHook, SweepOutcome, VisibilityCallback, VisibilityOptions, VisibilityRegistration,
    VisibilityWatcher,
};
