pub mod api;
pub mod conversation;
pub mod fallback;

use std::sync::atomic::{
    AtomicBool,
    Ordering,
};

pub use api::{
    ContentProvider,
    ExampleOutcome,
};
pub use conversation::Conversation;
pub use fallback::fallback_example;

/// Why placeholder content is being shown instead of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedReason {
    CredentialMissing,
    ServiceUnavailable,
}

// Set while the last provider call failed. Written only by the provider, on
// the single logical thread that drives it; readers tolerate the value
// changing between reads.
static DEGRADED_MODE: AtomicBool = AtomicBool::new(false);

pub fn degraded_mode() -> bool {
    DEGRADED_MODE.load(Ordering::Relaxed)
}

pub(crate) fn set_degraded_mode(degraded: bool) {
    DEGRADED_MODE.store(degraded, Ordering::Relaxed);
}
