//! The interface shared by the search strategies.

use tracing::{info, trace};

use crate::{CancelToken, Error, Match, Result, SearchObserver, SearchRequest, SearchResult, StrategyKind};

/// Everything a strategy needs besides the request.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub observer: &'a dyn SearchObserver,
    pub cancel: &'a CancelToken,
    /// Report every candidate to the observer, not only matches.
    pub verbose: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(observer: &'a dyn SearchObserver, cancel: &'a CancelToken) -> Self {
        Self {
            observer,
            cancel,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub(crate) fn candidate(&self, strategy: StrategyKind, id: &str) {
        trace!(%strategy, id, "trying candidate");
        if self.verbose {
            self.observer.candidate(strategy, id);
        }
    }

    pub(crate) fn matched(&self, strategy: StrategyKind, found: &Match) {
        info!(%strategy, id = %found.id, "match: {}", found.description);
        self.observer.matched(strategy, found);
    }

    pub(crate) fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// One way of looking for the algorithm behind a digest.
pub trait Strategy: Sync {
    fn kind(&self) -> StrategyKind;

    /// Try every candidate of `request.width` bits against the request.
    ///
    /// Returns [`Error::Parameter`] when this strategy cannot serve the
    /// width at all.
    fn find(&self, request: &SearchRequest, ctx: &SearchContext<'_>) -> Result<SearchResult>;
}

/// Reject widths outside `min..=max` as a parameter error of `strategy`.
pub(crate) fn check_width(strategy: StrategyKind, width: u32, min: u32, max: u32) -> Result<()> {
    hashsleuth_crc::check_width(width, min, max).map_err(|e| Error::parameter(strategy, e))
}
