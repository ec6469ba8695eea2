//! Search among published CRC models.

use hashsleuth_crc::{Catalogue, Crc};
use tracing::debug;

use crate::strategy::{check_width, SearchContext, Strategy};
use crate::{Error, Match, Result, SearchRequest, SearchResult, StrategyKind};

/// Tries every catalogue model of the requested width.
#[derive(Debug, Clone, Copy)]
pub struct CatalogueLookup {
    catalogue: &'static Catalogue,
}

impl CatalogueLookup {
    pub const MIN_WIDTH: u32 = 8;
    pub const MAX_WIDTH: u32 = 64;

    pub fn new(catalogue: &'static Catalogue) -> Self {
        Self { catalogue }
    }

    /// Use the catalogue embedded in `hashsleuth-crc`.
    pub fn builtin() -> Result<Self> {
        Catalogue::builtin().map(Self::new).map_err(Error::Catalogue)
    }
}

impl Strategy for CatalogueLookup {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Catalogue
    }

    fn find(&self, request: &SearchRequest, ctx: &SearchContext<'_>) -> Result<SearchResult> {
        let kind = self.kind();
        check_width(kind, request.width, Self::MIN_WIDTH, Self::MAX_WIDTH)?;

        let mut result = SearchResult::default();
        for entry in self.catalogue.with_width(request.width) {
            ctx.check_cancelled()?;
            ctx.candidate(kind, &entry.id);

            let mut crc = Crc::new(entry.model.clone());
            crc.update(request.target.as_bytes());
            let matched = request.expected.matches(&crc.finalize_bytes()).then(|| Match {
                id: entry.id.clone(),
                description: format!("{} [crc:{}]", entry.description, entry.model),
            });
            if let Some(m) = &matched {
                ctx.matched(kind, m);
            }
            result.record(matched);
        }

        debug!(width = request.width, searched = %result.searched, found = result.found, "catalogue lookup done");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CancelToken, ChannelObserver, NullObserver, SearchEvent};
    use hashsleuth_common::{Encoding, Expected};

    fn run(request: &SearchRequest) -> Result<SearchResult> {
        let cancel = CancelToken::new();
        let ctx = SearchContext::new(&NullObserver, &cancel);
        CatalogueLookup::builtin().unwrap().find(request, &ctx)
    }

    #[test]
    fn test_finds_crc32() {
        let request = SearchRequest::new(
            32,
            b"123456789".to_vec(),
            Expected::text("CBF43926", Encoding::Hex),
        );
        let result = run(&request).unwrap();
        assert!(result.matches.iter().any(|m| m.id == "CRC-32/ISO-HDLC"));
        assert_eq!(result.found, result.matches.len() as u64);

        let tried = Catalogue::builtin().unwrap().with_width(32).count();
        assert_eq!(result.searched, num_bigint::BigUint::from(tried));
    }

    #[test]
    fn test_finds_crc16_from_raw_bytes() {
        let request = SearchRequest::new(16, b"123456789".to_vec(), Expected::bytes([0x31, 0xC3]));
        let result = run(&request).unwrap();
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].id, "CRC-16/XMODEM");
    }

    fn candidate_events(verbose: bool) -> usize {
        let (observer, events) = ChannelObserver::channel();
        let cancel = CancelToken::new();
        let ctx = SearchContext::new(&observer, &cancel).with_verbose(verbose);
        let request = SearchRequest::new(32, b"123456789".to_vec(), Expected::bytes([0; 4]));
        CatalogueLookup::builtin().unwrap().find(&request, &ctx).unwrap();
        drop(observer);
        events
            .iter()
            .filter(|e| matches!(e, SearchEvent::Candidate(StrategyKind::Catalogue, _)))
            .count()
    }

    #[test]
    fn test_candidates_reported_only_when_verbose() {
        assert_eq!(candidate_events(false), 0);

        let entries = Catalogue::builtin().unwrap().with_width(32).count();
        assert!(entries > 0);
        assert_eq!(candidate_events(true), entries);
    }

    #[test]
    fn test_unsupported_width_is_a_parameter_error() {
        for width in [7, 65] {
            let request = SearchRequest::new(width, b"x".to_vec(), Expected::bytes([0]));
            let err = run(&request).unwrap_err();
            assert!(err.is_parameter(), "{err}");
        }
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let ctx = SearchContext::new(&NullObserver, &cancel);
        let request = SearchRequest::new(32, b"x".to_vec(), Expected::bytes([0; 4]));
        let err = CatalogueLookup::builtin().unwrap().find(&request, &ctx).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
