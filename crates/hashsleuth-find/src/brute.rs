//! Exhaustive CRC parameter search.
//!
//! Every polynomial of the requested width is tried with `init` and `xorOut`
//! each in `{0, mask}` and both reflection flags, 16 models per polynomial.
//! The register after the data only depends on `(poly, init, refIn)`, so it is
//! computed four times per polynomial and the four output variants are
//! derived from it.
//!
//! Polynomials are spread over a rayon pool. Cancellation is checked once per
//! polynomial and progress is reported once per [`PROGRESS_BLOCK`]. Matches
//! reach the observer from the workers as they are found.

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering};

use hashsleuth_common::Expected;
use hashsleuth_crc::bits::{byte_len, mask, reflect, to_bytes};
use hashsleuth_crc::{compute, Crc, CrcModel};
use num_bigint::BigUint;
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::debug;

use crate::strategy::{check_width, SearchContext, Strategy};
use crate::{Error, Match, Result, SearchRequest, SearchResult, StrategyKind};

/// Models tried per polynomial.
pub const TRIALS_PER_POLY: u32 = 16;

/// Polynomials between two progress reports.
pub const PROGRESS_BLOCK: u64 = 1 << 12;

/// Inputs shorter than this are run through the bitwise engine; building a
/// table costs more than it saves.
const TABLE_THRESHOLD: usize = 256;

/// Matches kept in a brute-force result unless configured otherwise.
pub const MATCH_LIMIT: usize = 1000;

/// `(poly, init, refIn, refOut, xorOut)`
type Params = (u64, u64, bool, bool, u64);

/// Tries every CRC parameter set of the requested width.
///
/// Every match is passed to the observer as soon as it is found and counted
/// in `found`, but only the `match_limit` lowest parameter sets are kept in
/// the result.
#[derive(Debug, Clone, Copy)]
pub struct BruteForce {
    threads: Option<usize>,
    match_limit: usize,
}

impl Default for BruteForce {
    fn default() -> Self {
        Self {
            threads: None,
            match_limit: MATCH_LIMIT,
        }
    }
}

impl BruteForce {
    pub const MIN_WIDTH: u32 = 8;
    pub const MAX_WIDTH: u32 = 63;

    pub fn new() -> Self {
        Self::default()
    }

    /// Run on a dedicated pool of `threads` workers instead of rayon's global pool.
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_match_limit(mut self, limit: usize) -> Self {
        self.match_limit = limit;
        self
    }

    fn run(&self, request: &SearchRequest, ctx: &SearchContext<'_>) -> Result<SearchResult> {
        let kind = self.kind();
        let width = request.width;
        let all = mask(width);
        let total = all.wrapping_add(1);
        let data = request.target.as_bytes();
        let matcher = Matcher::new(&request.expected, width);
        let progress = ctx.observer.wants_progress();

        let done = AtomicU64::new(0);
        let found = AtomicU64::new(0);
        // Max-heap of the lowest parameter sets seen so far, at most `match_limit` long.
        let kept: Mutex<BinaryHeap<Params>> = Mutex::new(BinaryHeap::new());

        (0..=all).into_par_iter().try_for_each(|poly| -> Result<()> {
            ctx.check_cancelled()?;

            for init in [0, all] {
                for ref_in in [false, true] {
                    let model = CrcModel::new(width, poly, init, ref_in, false, 0)
                        .map_err(|e| Error::Internal(e.to_string()))?;
                    let register = if data.len() < TABLE_THRESHOLD {
                        compute(&model, data)
                    } else {
                        Crc::new(model).checksum(data)
                    };

                    for ref_out in [false, true] {
                        let out = if ref_out { reflect(register, width) } else { register };
                        for xor_out in [0, all] {
                            if !matcher.matches(out ^ xor_out) {
                                continue;
                            }
                            let params = (poly, init, ref_in, ref_out, xor_out);
                            found.fetch_add(1, Ordering::Relaxed);
                            ctx.matched(kind, &to_match(width, params)?);

                            let mut heap = kept.lock();
                            heap.push(params);
                            if heap.len() > self.match_limit {
                                heap.pop();
                            }
                        }
                    }
                }
            }

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if progress && (finished % PROGRESS_BLOCK == 0 || finished == total) {
                ctx.observer.progress(kind, finished, total);
            }
            Ok(())
        })?;

        let matches = kept
            .into_inner()
            .into_sorted_vec()
            .into_iter()
            .map(|params| to_match(width, params))
            .collect::<Result<Vec<_>>>()?;
        let found = found.into_inner();

        Ok(SearchResult {
            found,
            searched: BigUint::from(done.into_inner()) * TRIALS_PER_POLY,
            truncated: found > matches.len() as u64,
            matches,
        })
    }
}

impl Strategy for BruteForce {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BruteForce
    }

    fn find(&self, request: &SearchRequest, ctx: &SearchContext<'_>) -> Result<SearchResult> {
        check_width(self.kind(), request.width, Self::MIN_WIDTH, Self::MAX_WIDTH)?;
        debug!(width = request.width, threads = ?self.threads, "brute force started");

        let result = match self.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| Error::Internal(format!("cannot start worker pool: {e}")))?;
                pool.install(|| self.run(request, ctx))
            }
            None => self.run(request, ctx),
        }?;

        debug!(width = request.width, searched = %result.searched, found = result.found, "brute force done");
        Ok(result)
    }
}

/// Comparison against the expected digest, specialised for the hot loop.
enum Matcher<'a> {
    /// Raw bytes of the right length, as a register value.
    Value(u64),
    /// Raw bytes of the wrong length can never match.
    Never,
    /// Text must be rendered and compared per its encoding.
    Text(&'a Expected, u32),
}

impl<'a> Matcher<'a> {
    fn new(expected: &'a Expected, width: u32) -> Self {
        match expected {
            Expected::Bytes(bytes) if bytes.len() == byte_len(width) => {
                let value = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
                Matcher::Value(value)
            }
            Expected::Bytes(_) => Matcher::Never,
            Expected::Text { .. } => Matcher::Text(expected, width),
        }
    }

    #[inline]
    fn matches(&self, value: u64) -> bool {
        match self {
            Matcher::Value(target) => *target == value,
            Matcher::Never => false,
            Matcher::Text(expected, width) => expected.matches(&to_bytes(value, *width)),
        }
    }
}

fn to_match(width: u32, (poly, init, ref_in, ref_out, xor_out): Params) -> Result<Match> {
    let model = CrcModel::new(width, poly, init, ref_in, ref_out, xor_out)
        .map_err(|e| Error::Internal(e.to_string()))?;
    Ok(Match {
        id: format!("crc:{model}"),
        description: describe(&model),
    })
}

fn describe(model: &CrcModel) -> String {
    let digits = model.digest_len() * 2;
    format!(
        "CRC-{} poly=0x{:0digits$x} init=0x{:0digits$x} refIn={} refOut={} xorOut=0x{:0digits$x}",
        model.width(),
        model.poly(),
        model.init(),
        model.ref_in(),
        model.ref_out(),
        model.xor_out(),
    )
}
