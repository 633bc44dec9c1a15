//! Last-write-wins sequencing of layout requests.
//!
//! A host that recomputes the layout whenever the graph changes may have
//! several computations in flight. Each request takes a [`RequestToken`] from
//! a shared [`LayoutSequencer`] before it starts; when it finishes, its output
//! is released only if no newer request has begun in the meantime.
//!
//! ```
//! # use stagegraph::LayoutSequencer;
//! let sequencer = LayoutSequencer::new();
//!
//! let first = sequencer.begin();
//! let second = sequencer.begin();
//!
//! assert_eq!(sequencer.settle(first, "stale"), None);
//! assert_eq!(sequencer.settle(second, "fresh"), Some("fresh"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

/// Identifies one layout request issued by a [`LayoutSequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues increasing request tokens and remembers the latest one.
///
/// The sequencer is `Sync`; share it behind an `Arc` between the threads that
/// start and finish requests.
#[derive(Debug, Default)]
pub struct LayoutSequencer {
    latest: AtomicU64,
}

impl LayoutSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding every earlier one.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// The most recently issued token, if any.
    pub fn latest(&self) -> Option<RequestToken> {
        match self.latest.load(Ordering::Acquire) {
            0 => None,
            value => Some(RequestToken(value)),
        }
    }

    /// Whether no request has begun after `token`.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::Acquire) == token.0
    }

    /// Releases `output` when `token` is still current, discarding it otherwise.
    pub fn settle<T>(&self, token: RequestToken, output: T) -> Option<T> {
        if self.is_current(token) {
            Some(output)
        } else {
            debug!(token = token.0, latest = self.latest.load(Ordering::Acquire); "Discarding stale layout");
            None
        }
    }
}
