//! Search among the named algorithms of a digest provider.

use hashsleuth_digest::DigestProvider;
use tracing::debug;

use crate::strategy::{check_width, SearchContext, Strategy};
use crate::{Error, Match, Result, SearchRequest, SearchResult, StrategyKind};

/// Runs every provider algorithm with the requested output width.
#[derive(Clone, Copy)]
pub struct DocumentedSweep<'p> {
    provider: &'p dyn DigestProvider,
}

impl<'p> DocumentedSweep<'p> {
    pub const MIN_WIDTH: u32 = 8;
    pub const MAX_WIDTH: u32 = 64;

    pub fn new(provider: &'p dyn DigestProvider) -> Self {
        Self { provider }
    }
}

impl Strategy for DocumentedSweep<'_> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Documented
    }

    fn find(&self, request: &SearchRequest, ctx: &SearchContext<'_>) -> Result<SearchResult> {
        let kind = self.kind();
        check_width(kind, request.width, Self::MIN_WIDTH, Self::MAX_WIDTH)?;

        let mut result = SearchResult::default();
        for (id, description) in self.provider.list_algorithms(Some(request.width)) {
            ctx.check_cancelled()?;
            ctx.candidate(kind, &id);

            let mut digest = self.provider.instantiate(&id).map_err(|e| {
                Error::Internal(format!("algorithm {id} is listed but cannot be created: {e}"))
            })?;
            let value = digest.digest(request.target.as_bytes());

            let matched = request
                .expected
                .matches(&value)
                .then_some(Match { id, description });
            if let Some(m) = &matched {
                ctx.matched(kind, m);
            }
            result.record(matched);
        }

        debug!(width = request.width, searched = %result.searched, found = result.found, "documented sweep done");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{CancelToken, NullObserver};
    use hashsleuth_common::{Encoding, Expected};
    use hashsleuth_digest::{Digest, Registry};

    fn run(provider: &dyn DigestProvider, request: &SearchRequest) -> Result<SearchResult> {
        let cancel = CancelToken::new();
        let ctx = SearchContext::new(&NullObserver, &cancel);
        DocumentedSweep::new(provider).find(request, &ctx)
    }

    #[test]
    fn test_finds_adler32_and_crc32() {
        let registry = Registry::builtin().unwrap();
        let request = SearchRequest::new(
            32,
            b"123456789".to_vec(),
            Expected::text("091E01DE", Encoding::Hex),
        );
        let result = run(&registry, &request).unwrap();
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].id, "adler32");
        assert_eq!(
            result.searched,
            num_bigint::BigUint::from(registry.list_algorithms(Some(32)).len())
        );

        let request = SearchRequest::new(32, b"123456789".to_vec(), Expected::bytes([0xCB, 0xF4, 0x39, 0x26]));
        let result = run(&registry, &request).unwrap();
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].id, "crc32");
    }

    #[test]
    fn test_base64_comparison_is_case_sensitive() {
        let registry = Registry::builtin().unwrap();
        // crc32 of "123456789" in base64 is "y/Q5Jg=="
        let exact = SearchRequest::new(32, b"123456789".to_vec(), Expected::text("y/Q5Jg==", Encoding::Base64));
        assert_eq!(run(&registry, &exact).unwrap().found, 1);

        let wrong_case = SearchRequest::new(32, b"123456789".to_vec(), Expected::text("Y/q5jG==", Encoding::Base64));
        assert_eq!(run(&registry, &wrong_case).unwrap().found, 0);
    }

    struct Inconsistent;

    impl DigestProvider for Inconsistent {
        fn list_algorithms(&self, _bits: Option<u32>) -> BTreeMap<String, String> {
            BTreeMap::from([("ghost".to_string(), "listed but missing".to_string())])
        }

        fn instantiate(&self, id: &str) -> hashsleuth_digest::Result<Box<dyn Digest>> {
            Err(hashsleuth_digest::Error::UnknownAlgorithm(id.to_string()))
        }
    }

    #[test]
    fn test_unconstructible_algorithm_is_internal() {
        let request = SearchRequest::new(16, b"x".to_vec(), Expected::bytes([0, 0]));
        let err = run(&Inconsistent, &request).unwrap_err();
        assert!(matches!(err, Error::Internal(_)), "{err}");
        assert!(!err.is_parameter());
    }

    #[test]
    fn test_width_64_is_accepted_and_65_is_not() {
        let registry = Registry::builtin().unwrap();
        let ok = SearchRequest::new(64, b"x".to_vec(), Expected::bytes([0; 8]));
        assert!(run(&registry, &ok).is_ok());

        let too_wide = SearchRequest::new(65, b"x".to_vec(), Expected::bytes([0; 9]));
        assert!(run(&registry, &too_wide).unwrap_err().is_parameter());
    }
}
