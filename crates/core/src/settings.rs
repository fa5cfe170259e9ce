//! Settings the assistant reads at the start of each turn.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// The max-token budget used when nothing else is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// A read-only view of the user's settings.
///
/// The assistant never writes settings. It reads them once per turn, so
/// changes take effect on the next turn.
pub trait Settings: Send + Sync {
    /// Returns the maximum number of tokens a reply may use.
    fn max_tokens(&self) -> u32;
}

/// Settings with a fixed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixedSettings {
    /// The maximum number of tokens a reply may use.
    pub max_tokens: u32,
}

impl Default for FixedSettings {
    #[inline]
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl Settings for FixedSettings {
    #[inline]
    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// Settings that can be changed while the assistant is running.
///
/// Clones share the same values.
#[derive(Clone, Debug, Default)]
pub struct SharedSettings {
    max_tokens: Arc<AtomicU32>,
}

impl SharedSettings {
    /// Creates shared settings with the given budget.
    #[inline]
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens: Arc::new(AtomicU32::new(max_tokens)),
        }
    }

    /// Changes the budget for subsequent turns.
    #[inline]
    pub fn set_max_tokens(&self, max_tokens: u32) {
        self.max_tokens.store(max_tokens, Ordering::Relaxed);
    }
}

impl Settings for SharedSettings {
    #[inline]
    fn max_tokens(&self) -> u32 {
        self.max_tokens.load(Ordering::Relaxed)
    }
}
