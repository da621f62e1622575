//! Cooperative cancellation: a cheap, cloneable handle
//! checked at import-loading boundaries, the only suspension points in an
//! otherwise synchronous pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cancellation flag shared between a caller and a running compilation.
///
/// Cloning shares the same underlying flag; `cancel()` from any clone is
/// visible to every other clone and to `is_cancelled()`.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
