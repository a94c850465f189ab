use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use crate::app::ports::{AddressLookupPort, RateLimiterPort};
use crate::common::constants::{DEFAULT_CONCURRENCY, PROGRESS_LOG_INTERVAL};
use crate::common::types::{AddressPair, NormalizedQuery, ValidationResult};
use crate::observability::metrics;
use crate::pipeline::row_validator;

/// Use case for turning raw sheet rows into validated address results
pub struct ValidateUseCase {
    lookup: Box<dyn AddressLookupPort>,
    rate: Box<dyn RateLimiterPort>,
    concurrency: usize,
}

impl ValidateUseCase {
    pub fn new(lookup: Box<dyn AddressLookupPort>, rate: Box<dyn RateLimiterPort>) -> Self {
        Self {
            lookup,
            rate,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Number of lookups allowed in flight at once. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Validates every row from `start_index` (0-based) onward.
    ///
    /// Rows with both cells empty produce nothing. Every other row produces exactly
    /// one result, in input order, whether or not the lookup succeeded.
    pub async fn validate(
        &self,
        pairs: &[AddressPair],
        start_index: usize,
    ) -> Vec<ValidationResult> {
        let mut skipped = 0usize;
        let queries: Vec<(usize, NormalizedQuery)> = pairs
            .iter()
            .enumerate()
            .skip(start_index)
            .filter(|(row, pair)| {
                let skip = row_validator::should_skip(pair);
                if skip {
                    debug!(row = *row, "Skipping blank row");
                    skipped += 1;
                }
                !skip
            })
            .map(|(row, pair)| (row, row_validator::normalize(pair)))
            .collect();

        let total = queries.len();
        info!(rows = total, skipped, concurrency = self.concurrency, "Validating addresses");
        metrics::rows::skipped(skipped as u64);

        let mut results = Vec::with_capacity(total);
        let mut resolved = 0usize;
        let mut lookups = stream::iter(queries)
            .map(|(row, query)| self.resolve(row, query))
            .buffered(self.concurrency);

        while let Some(result) = lookups.next().await {
            if result.is_resolved() {
                resolved += 1;
            }
            results.push(result);
            if results.len() % PROGRESS_LOG_INTERVAL == 0 {
                info!("Validated {}/{} rows", results.len(), total);
            }
        }

        info!(
            resolved,
            failed = total - resolved,
            skipped,
            "Validation finished"
        );
        results
    }

    #[instrument(
        skip(self, query),
        fields(postcode = %query.postcode, house_number = %query.house_number)
    )]
    async fn resolve(&self, row: usize, query: NormalizedQuery) -> ValidationResult {
        self.rate.acquire().await;
        match self.lookup.lookup(&query).await {
            Ok(formatted_address) => {
                metrics::rows::resolved();
                ValidationResult::resolved(formatted_address, query.postcode)
            }
            Err(failure) => {
                warn!(error = %failure, "Lookup failed, writing marker");
                metrics::rows::failed();
                ValidationResult::failed(query.postcode)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::LookupFailure;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    struct NoLimit;

    #[async_trait]
    impl RateLimiterPort for NoLimit {
        async fn acquire(&self) {}
    }

    /// Answers from a fixed table keyed by postcode; records every query it sees.
    struct MockLookup {
        answers: HashMap<String, Result<String, LookupFailure>>,
        seen: Arc<tokio::sync::Mutex<Vec<NormalizedQuery>>>,
        delay_for: Option<String>,
    }

    impl MockLookup {
        fn new(answers: Vec<(&str, Result<&str, LookupFailure>)>) -> Self {
            Self {
                answers: answers
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                    .collect(),
                seen: Arc::new(tokio::sync::Mutex::new(Vec::new())),
                delay_for: None,
            }
        }
    }

    #[async_trait]
    impl AddressLookupPort for MockLookup {
        async fn lookup(&self, query: &NormalizedQuery) -> Result<String, LookupFailure> {
            self.seen.lock().await.push(query.clone());
            if self.delay_for.as_deref() == Some(query.postcode.as_str()) {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.answers
                .get(&query.postcode)
                .cloned()
                .unwrap_or(Err(LookupFailure::Status(404)))
        }
    }

    fn use_case(lookup: MockLookup) -> ValidateUseCase {
        ValidateUseCase::new(Box::new(lookup), Box::new(NoLimit))
    }

    #[tokio::test]
    async fn test_blank_rows_are_skipped() {
        let lookup = MockLookup::new(vec![("SW1A2AA", Ok("10\nDowning Street"))]);
        let seen = lookup.seen.clone();
        let pairs = vec![
            AddressPair::new("", ""),
            AddressPair::new("10 Downing Street", "SW1A 2AA"),
            AddressPair::new("", ""),
        ];

        let results = use_case(lookup).validate(&pairs, 0).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].to_cell_text(), "10\nDowning Street\nSW1A2AA");
        assert_eq!(seen.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_half_empty_rows_are_still_looked_up() {
        let lookup = MockLookup::new(vec![]);
        let seen = lookup.seen.clone();
        let pairs = vec![
            AddressPair::new("10 Downing Street", ""),
            AddressPair::new("", "SW1A 2AA"),
        ];

        let results = use_case(lookup).validate(&pairs, 0).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].to_cell_text(), "BAD INPUT\n");
        assert_eq!(results[1].to_cell_text(), "BAD INPUT\nSW1A2AA");
        let seen = seen.lock().await;
        assert_eq!(seen[0], NormalizedQuery { house_number: "10".into(), postcode: "".into() });
        assert_eq!(
            seen[1],
            NormalizedQuery {
                house_number: "".into(),
                postcode: "SW1A2AA".into()
            }
        );
    }

    #[tokio::test]
    async fn test_start_index_skips_leading_rows() {
        let lookup = MockLookup::new(vec![("B22BB", Ok("2\nB Road"))]);
        let pairs = vec![
            AddressPair::new("Name", "Postcode"),
            AddressPair::new("2 B Road", "B2 2BB"),
        ];

        let results = use_case(lookup).validate(&pairs, 1).await;
        assert_eq!(results, vec![ValidationResult::resolved("2\nB Road", "B22BB")]);

        let lookup = MockLookup::new(vec![]);
        assert!(use_case(lookup).validate(&pairs, 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_the_batch() {
        let lookup = MockLookup::new(vec![
            ("A11AA", Ok("1\nA Street")),
            ("B22BB", Err(LookupFailure::NoAddresses)),
            ("C33CC", Err(LookupFailure::Transport("connection reset".into()))),
            ("D44DD", Ok("4\nD Street")),
        ]);
        let pairs = vec![
            AddressPair::new("1 A Street", "A1 1AA"),
            AddressPair::new("2 B Street", "B2 2BB"),
            AddressPair::new("3 C Street", "C3 3CC"),
            AddressPair::new("4 D Street", "D4 4DD"),
        ];

        let results = use_case(lookup).validate(&pairs, 0).await;

        let cells: Vec<String> = results.iter().map(ValidationResult::to_cell_text).collect();
        assert_eq!(
            cells,
            vec![
                "1\nA Street\nA11AA",
                "BAD INPUT\nB22BB",
                "BAD INPUT\nC33CC",
                "4\nD Street\nD44DD",
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrent_lookups_keep_input_order() {
        let mut lookup = MockLookup::new(vec![
            ("A11AA", Ok("1\nA Street")),
            ("B22BB", Ok("2\nB Street")),
            ("C33CC", Ok("3\nC Street")),
        ]);
        // The first row finishes last
        lookup.delay_for = Some("A11AA".to_string());
        let pairs = vec![
            AddressPair::new("1 A Street", "A1 1AA"),
            AddressPair::new("2 B Street", "B2 2BB"),
            AddressPair::new("3 C Street", "C3 3CC"),
        ];

        let results = use_case(lookup).with_concurrency(3).validate(&pairs, 0).await;

        let postcodes: Vec<&str> = results.iter().map(ValidationResult::postcode).collect();
        assert_eq!(postcodes, vec!["A11AA", "B22BB", "C33CC"]);
    }

    #[tokio::test]
    async fn test_validation_is_idempotent() {
        let pairs = vec![
            AddressPair::new("10 Downing Street", "SW1A 2AA"),
            AddressPair::new("", ""),
            AddressPair::new("99 Nowhere", "ZZ9 9ZZ"),
        ];
        let uc = use_case(MockLookup::new(vec![("SW1A2AA", Ok("10\nDowning Street"))]));

        let first = uc.validate(&pairs, 0).await;
        let second = uc.validate(&pairs, 0).await;
        assert_eq!(first, second);
    }
}
