//! Running the strategies in order and combining their results.

use hashsleuth_crc::Catalogue;
use hashsleuth_digest::DigestProvider;
use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use crate::strategy::{SearchContext, Strategy};
use crate::{
    BruteForce, CancelToken, CatalogueLookup, DocumentedSweep, Error, Match, Result, SearchObserver,
    SearchRequest, SearchResult, StrategyKind, MATCH_LIMIT,
};

/// Search configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Brute-force worker threads; `None` uses rayon's global pool.
    pub threads: Option<usize>,
    /// Strategies to run. They always run in [`StrategyKind::ALL`] order.
    pub strategies: Vec<StrategyKind>,
    /// Report every candidate to the observer.
    pub verbose: bool,
    /// Brute-force matches kept in the report. Every match is still counted
    /// and passed to the observer.
    pub max_matches: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threads: None,
            strategies: StrategyKind::ALL.to_vec(),
            verbose: false,
            max_matches: MATCH_LIMIT,
        }
    }
}

impl SearchOptions {
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_strategies(mut self, strategies: impl IntoIterator<Item = StrategyKind>) -> Self {
        self.strategies = strategies.into_iter().collect();
        self
    }

    /// Leave `strategy` out of the run.
    pub fn without(mut self, strategy: StrategyKind) -> Self {
        self.strategies.retain(|&s| s != strategy);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_max_matches(mut self, max_matches: usize) -> Self {
        self.max_matches = max_matches;
        self
    }

    fn runs(&self, strategy: StrategyKind) -> bool {
        self.strategies.contains(&strategy)
    }
}

/// Final outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Found,
    NotFound,
}

/// What one strategy contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategySummary {
    pub strategy: StrategyKind,
    /// `None` when the strategy was skipped.
    pub found: Option<u64>,
    #[serde(serialize_with = "serialize_count")]
    pub searched: BigUint,
    /// Why the strategy was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

/// The combined result of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    pub width: u32,
    pub outcome: Outcome,
    pub found: u64,
    /// Total candidates tried. Serialised as a decimal string, since it can
    /// exceed every JSON number type.
    #[serde(serialize_with = "serialize_count")]
    pub searched: BigUint,
    pub matches: Vec<Match>,
    /// `matches` was cut short; `found` is still exact.
    pub truncated: bool,
    pub strategies: Vec<StrategySummary>,
}

impl SearchReport {
    pub fn is_found(&self) -> bool {
        self.outcome == Outcome::Found
    }

    /// Reasons strategies were skipped.
    pub fn warnings(&self) -> impl Iterator<Item = (StrategyKind, &str)> {
        self.strategies
            .iter()
            .filter_map(|s| s.skipped.as_deref().map(|reason| (s.strategy, reason)))
    }
}

fn serialize_count<S: Serializer>(value: &BigUint, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_str_radix(10))
}

/// Runs catalogue lookup, the documented sweep and brute force in order.
///
/// A strategy that cannot serve the requested width is skipped with a
/// warning; any other error ends the search.
pub struct SearchOrchestrator<'p> {
    provider: &'p dyn DigestProvider,
    catalogue: &'static Catalogue,
    options: SearchOptions,
}

impl<'p> SearchOrchestrator<'p> {
    /// Search with `provider` and the embedded CRC catalogue.
    pub fn new(provider: &'p dyn DigestProvider, options: SearchOptions) -> Result<Self> {
        let catalogue = Catalogue::builtin().map_err(Error::Catalogue)?;
        Ok(Self::with_catalogue(provider, catalogue, options))
    }

    pub fn with_catalogue(
        provider: &'p dyn DigestProvider,
        catalogue: &'static Catalogue,
        options: SearchOptions,
    ) -> Self {
        Self {
            provider,
            catalogue,
            options,
        }
    }

    /// Run the search.
    pub fn search(
        &self,
        request: &SearchRequest,
        observer: &dyn SearchObserver,
        cancel: &CancelToken,
    ) -> Result<SearchReport> {
        let ctx = SearchContext::new(observer, cancel).with_verbose(self.options.verbose);

        let catalogue = CatalogueLookup::new(self.catalogue);
        let documented = DocumentedSweep::new(self.provider);
        let brute = BruteForce::new()
            .with_threads(self.options.threads)
            .with_match_limit(self.options.max_matches);
        let strategies: [&dyn Strategy; 3] = [&catalogue, &documented, &brute];

        let mut total = SearchResult::default();
        let mut summaries = Vec::new();

        for strategy in strategies {
            let kind = strategy.kind();
            if !self.options.runs(kind) {
                continue;
            }

            debug!(strategy = %kind, width = request.width, "strategy started");
            observer.strategy_started(kind);

            match strategy.find(request, &ctx) {
                Ok(result) => {
                    observer.strategy_finished(kind, result.found);
                    summaries.push(StrategySummary {
                        strategy: kind,
                        found: Some(result.found),
                        searched: result.searched.clone(),
                        skipped: None,
                    });
                    total.merge(result);
                }
                Err(e) if e.is_parameter() => {
                    let reason = e.to_string();
                    warn!(strategy = %kind, "skipped: {reason}");
                    observer.strategy_skipped(kind, &reason);
                    summaries.push(StrategySummary {
                        strategy: kind,
                        found: None,
                        searched: BigUint::default(),
                        skipped: Some(reason),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let outcome = if total.is_found() {
            Outcome::Found
        } else {
            Outcome::NotFound
        };
        debug!(?outcome, found = total.found, searched = %total.searched, "search finished");

        Ok(SearchReport {
            width: request.width,
            outcome,
            found: total.found,
            searched: total.searched,
            matches: total.matches,
            truncated: total.truncated,
            strategies: summaries,
        })
    }
}
