//! Cooperative cancellation.
//!
//! The calling service owns run exclusivity; the core only needs a flag
//! it can poll. [`CancellationToken`] is a cheap clone-shareable atomic
//! flag checked at generation boundaries, once per individual during
//! initialization, and inside operator slot-search loops. A cancelled
//! run returns [`SolveError::Cancelled`](crate::SolveError::Cancelled)
//! and never a partial schedule.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
///
/// Clones observe the same flag; cancellation is sticky.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
