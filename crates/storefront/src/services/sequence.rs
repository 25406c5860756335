//! Newest-request-wins result slots.
//!
//! A page or category change can start a new catalog fetch while an older
//! one is still in flight. Each fetch takes a [`RequestToken`] from a
//! [`LatestSlot`] before it starts and offers its result back with that
//! token; the slot keeps it only if no newer request has been started since.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Sequence number handed to a fetch when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Holds the result of the most recently started request.
#[derive(Debug)]
pub struct LatestSlot<T> {
    issued: AtomicU64,
    committed: Mutex<Option<(RequestToken, T)>>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self {
            issued: AtomicU64::new(0),
            committed: Mutex::new(None),
        }
    }
}

impl<T: Clone> LatestSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request. Every earlier token becomes stale.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` belongs to the most recently started request.
    #[must_use]
    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.0
    }

    /// Store `value` if `token` is still the latest request.
    ///
    /// Returns `false`, leaving the slot untouched, for stale tokens.
    pub fn commit(&self, token: RequestToken, value: T) -> bool {
        let mut committed = self
            .committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // checked under the lock so a newer commit cannot slip in between
        if !self.is_latest(token) {
            return false;
        }
        if committed.as_ref().is_some_and(|(held, _)| *held >= token) {
            return false;
        }
        *committed = Some((token, value));
        true
    }

    /// The last committed value.
    #[must_use]
    pub fn current(&self) -> Option<T> {
        self.committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, value)| value.clone())
    }
}
