//! Coalescing of change notifications
//!
//! Snapshots tend to arrive in bursts (a cascade delete pushes one task
//! snapshot per deleted task). [`Debouncer`] folds a burst into one
//! [`ChangeBurst`] that is released only after the feed has been quiet for
//! the configured delay.

use std::collections::BTreeSet;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracker_model::EntityKind;

/// Default quiet period before a refresh
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Kinds touched by one coalesced burst
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBurst {
    /// Collections that changed
    pub kinds: BTreeSet<EntityKind>,
    /// Notifications folded into this burst
    pub notifications: usize,
    /// Whether notifications were dropped because the receiver lagged
    pub lagged: bool,
}

impl ChangeBurst {
    fn record(&mut self, event: Result<EntityKind, RecvError>) {
        match event {
            Ok(kind) => {
                self.kinds.insert(kind);
                self.notifications += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                // Unknown which kinds were skipped, so assume all of them
                self.kinds.extend(EntityKind::ALL);
                self.notifications += usize::try_from(skipped).unwrap_or(usize::MAX);
                self.lagged = true;
            }
            Err(RecvError::Closed) => {}
        }
    }

    /// Whether a collection changed in this burst
    #[inline]
    #[must_use]
    pub fn touches(&self, kind: EntityKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Trailing-edge debouncer over a change feed
#[derive(Debug)]
pub struct Debouncer {
    rx: broadcast::Receiver<EntityKind>,
    delay: Duration,
}

impl Debouncer {
    /// Create debouncer over a change receiver
    #[inline]
    #[must_use]
    pub fn new(rx: broadcast::Receiver<EntityKind>, delay: Duration) -> Self {
        Self { rx, delay }
    }

    /// Quiet period
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the next burst. Resolves `delay` after the last
    /// notification of the burst; `None` once the feed is closed and drained.
    pub async fn next_burst(&mut self) -> Option<ChangeBurst> {
        let mut burst = ChangeBurst::default();

        match self.rx.recv().await {
            Err(RecvError::Closed) => return None,
            first => burst.record(first),
        }

        loop {
            match tokio::time::timeout(self.delay, self.rx.recv()).await {
                Err(_quiet) => break,
                Ok(Err(RecvError::Closed)) => break,
                Ok(event) => burst.record(event),
            }
        }

        tracing::debug!(
            kinds = ?burst.kinds,
            notifications = burst.notifications,
            "change burst settled"
        );
        Some(burst)
    }
}
