//! Search input debouncing.
//!
//! Collapses a stream of raw text edits into a single committed value:
//! a commit is emitted only after a quiet period with no further input,
//! and only when it differs from the previously committed text. The
//! debouncer is poll-driven — the owner calls [`SearchDebouncer::poll`]
//! from its event loop with the current time; no timer thread exists, so
//! cancellation is simply dropping the pending value.

use std::time::{Duration, Instant};

#[cfg(test)]
#[path = "debounce_tests.rs"]
mod tests;

/// Default quiet period before a search commit.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct Pending {
    text: String,
    deadline: Instant,
}

/// Debouncer for free-text search input.
///
/// Owned by one feed instance. Superseded pending values are discarded,
/// never emitted; after [`cancel`](SearchDebouncer::cancel) no emission
/// can occur until new input arrives.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    quiet: Duration,
    pending: Option<Pending>,
    committed: Option<String>,
}

impl SearchDebouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            committed: None,
        }
    }

    /// Record a raw text edit at `now`, re-arming the quiet period.
    ///
    /// Any previously pending value is superseded and will never be
    /// emitted.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some(Pending {
            text: text.into(),
            deadline: now + self.quiet,
        });
    }

    /// Emit the committed text if the quiet period has elapsed.
    ///
    /// Returns `Some` at most once per pending value, and never when the
    /// pending text equals the previously committed text (strict
    /// deduplication — re-submitting the same query produces no event).
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = matches!(&self.pending, Some(p) if now >= p.deadline);
        if !due {
            return None;
        }
        let pending = self.pending.take().expect("checked above");
        if self.committed.as_deref() == Some(pending.text.as_str()) {
            tracing::trace!("dropping duplicate search commit");
            return None;
        }
        self.committed = Some(pending.text.clone());
        Some(pending.text)
    }

    /// Discard any pending emission. Called on feed teardown.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether an uncommitted value is waiting for its quiet period.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The most recently committed text, if any commit has happened.
    pub fn last_committed(&self) -> Option<&str> {
        self.committed.as_deref()
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}
