//! Progress reporting and cancellation.
//!
//! Strategies report what they are doing through a [`SearchObserver`]. The
//! default methods do nothing, so [`NullObserver`] costs nothing; a
//! [`ChannelObserver`] forwards events to another thread so that printing
//! never holds up the search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::{Match, StrategyKind};

/// Receives search events. Called from worker threads.
pub trait SearchObserver: Sync {
    /// Whether brute-force progress should be reported at all.
    fn wants_progress(&self) -> bool {
        false
    }

    fn strategy_started(&self, _strategy: StrategyKind) {}

    /// A candidate is about to be tried. Only called in verbose mode.
    fn candidate(&self, _strategy: StrategyKind, _id: &str) {}

    fn matched(&self, _strategy: StrategyKind, _found: &Match) {}

    /// Brute-force progress, in polynomials done out of `total`.
    fn progress(&self, _strategy: StrategyKind, _done: u64, _total: u64) {}

    fn strategy_finished(&self, _strategy: StrategyKind, _found: u64) {}

    /// A strategy could not serve the request and was skipped.
    fn strategy_skipped(&self, _strategy: StrategyKind, _reason: &str) {}
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SearchObserver for NullObserver {}

/// An event forwarded by [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Started(StrategyKind),
    Candidate(StrategyKind, String),
    Matched(StrategyKind, Match),
    Progress {
        strategy: StrategyKind,
        done: u64,
        total: u64,
    },
    Finished(StrategyKind, u64),
    Skipped(StrategyKind, String),
}

/// Forwards events over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<SearchEvent>,
    progress: bool,
}

impl ChannelObserver {
    /// Forward to `sender`, including progress events.
    pub fn new(sender: Sender<SearchEvent>) -> Self {
        Self {
            sender,
            progress: true,
        }
    }

    /// A new observer and the receiving end of its channel.
    pub fn channel() -> (Self, Receiver<SearchEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new(sender), receiver)
    }

    /// Whether to forward brute-force progress.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    fn send(&self, event: SearchEvent) {
        // A dropped receiver only means nobody is listening any more.
        let _ = self.sender.send(event);
    }
}

impl SearchObserver for ChannelObserver {
    fn wants_progress(&self) -> bool {
        self.progress
    }

    fn strategy_started(&self, strategy: StrategyKind) {
        self.send(SearchEvent::Started(strategy));
    }

    fn candidate(&self, strategy: StrategyKind, id: &str) {
        self.send(SearchEvent::Candidate(strategy, id.to_string()));
    }

    fn matched(&self, strategy: StrategyKind, found: &Match) {
        self.send(SearchEvent::Matched(strategy, found.clone()));
    }

    fn progress(&self, strategy: StrategyKind, done: u64, total: u64) {
        self.send(SearchEvent::Progress {
            strategy,
            done,
            total,
        });
    }

    fn strategy_finished(&self, strategy: StrategyKind, found: u64) {
        self.send(SearchEvent::Finished(strategy, found));
    }

    fn strategy_skipped(&self, strategy: StrategyKind, reason: &str) {
        self.send(SearchEvent::Skipped(strategy, reason.to_string()));
    }
}

/// Cooperative cancellation flag shared between a search and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the search to stop at the next check.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_observer_forwards_events() {
        let (observer, events) = ChannelObserver::channel();
        observer.strategy_started(StrategyKind::Catalogue);
        observer.candidate(StrategyKind::Catalogue, "CRC-8/SMBUS");
        observer.strategy_finished(StrategyKind::Catalogue, 0);
        drop(observer);

        let received: Vec<SearchEvent> = events.iter().collect();
        assert_eq!(
            received,
            vec![
                SearchEvent::Started(StrategyKind::Catalogue),
                SearchEvent::Candidate(StrategyKind::Catalogue, "CRC-8/SMBUS".into()),
                SearchEvent::Finished(StrategyKind::Catalogue, 0),
            ]
        );
    }

    #[test]
    fn test_send_after_receiver_dropped_is_ignored() {
        let (observer, events) = ChannelObserver::channel();
        drop(events);
        observer.strategy_started(StrategyKind::BruteForce);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
