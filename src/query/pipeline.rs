//! Lookup and location resolution of a batch of patterns.
//!
//! [`QueryPipeline`] drives a [`SeedIndex`] in one of two [`QueryMode`]s. Both
//! produce the same locations in the same order; they differ only in when
//! ranges are resolved and in which timings are reported.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::core::types::{Location, MatchRange, Pattern};
use crate::index::SeedIndex;
use crate::query::progress::RunCounters;
use crate::utils::timer::{format_duration, timed};

/// How lookups and location resolution are scheduled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum QueryMode {
    /// Find every pattern first, then locate all matching ranges
    #[default]
    TwoPhase,
    /// Find and locate each pattern before moving to the next
    Streaming,
}

/// Configuration for the query pipeline
#[derive(Debug, Clone, Default)]
pub struct QueryConfig {
    pub mode: QueryMode,
    /// Ask the index to collapse duplicate occurrences
    pub dedup: bool,
}

/// Summary numbers of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryStats {
    pub patterns: usize,
    /// Patterns whose range was non-empty
    pub matched_patterns: usize,
    /// Matching paths as counted by the index
    pub paths: u64,
    pub occurrences: u64,
    /// Duration of the find pass; two-phase mode only
    #[serde(serialize_with = "serialize_opt_secs")]
    pub find_time: Option<Duration>,
    #[serde(serialize_with = "serialize_secs")]
    pub locate_time: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

fn serialize_opt_secs<S: serde::Serializer>(
    d: &Option<Duration>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_some(&d.as_secs_f64()),
        None => s.serialize_none(),
    }
}

/// Result of running the pipeline
#[derive(Debug, Clone, Default)]
pub struct QueryOutcome {
    /// Occurrences in the order they were located
    pub locations: Vec<Location>,
    pub stats: QueryStats,
}

/// Runs patterns against an index, resolving matches into locations
pub struct QueryPipeline<'a, I: SeedIndex> {
    index: &'a I,
    config: QueryConfig,
    counters: Arc<RunCounters>,
}

impl<'a, I: SeedIndex> QueryPipeline<'a, I> {
    /// Create a pipeline with its own counters
    pub fn new(index: &'a I, config: QueryConfig) -> Self {
        Self::with_counters(index, config, Arc::new(RunCounters::new()))
    }

    /// Create a pipeline updating counters shared with a progress observer
    pub fn with_counters(index: &'a I, config: QueryConfig, counters: Arc<RunCounters>) -> Self {
        Self {
            index,
            config,
            counters,
        }
    }

    pub fn counters(&self) -> &Arc<RunCounters> {
        &self.counters
    }

    /// Look up and locate every pattern.
    ///
    /// Every pattern counts towards `patterns_done`, matched or not, so the
    /// counters end with `patterns_done == patterns_total`.
    pub fn run(&self, patterns: &[Pattern<'_>]) -> QueryOutcome {
        self.counters.set_total(patterns.len());
        debug!(
            "Querying {} patterns ({:?} mode, dedup: {})",
            patterns.len(),
            self.config.mode,
            self.config.dedup
        );

        match self.config.mode {
            QueryMode::TwoPhase => self.run_two_phase(patterns),
            QueryMode::Streaming => self.run_streaming(patterns),
        }
    }

    fn run_two_phase(&self, patterns: &[Pattern<'_>]) -> QueryOutcome {
        let ((ranges, paths), find_time) = timed(|| {
            let mut ranges: Vec<MatchRange> = Vec::new();
            let mut paths = 0u64;
            for pattern in patterns {
                let range = self.index.find(pattern);
                if !range.is_empty() {
                    paths += self.index.count(&range);
                    ranges.push(range);
                }
            }
            (ranges, paths)
        });

        self.counters.add_paths(paths);
        info!(
            "Found {} patterns matching {} paths in {}.",
            ranges.len(),
            paths,
            format_duration(find_time)
        );

        // Unmatched patterns have nothing left to do.
        self.counters.record_unmatched(patterns.len() - ranges.len());
        self.counters.mark_locate_started();

        let (locations, locate_time) = timed(|| {
            let mut locations = Vec::new();
            for range in &ranges {
                let found = self.index.locate(range, self.config.dedup);
                self.counters.record_located(found.len());
                locations.extend(found);
            }
            locations
        });

        QueryOutcome {
            stats: QueryStats {
                patterns: patterns.len(),
                matched_patterns: ranges.len(),
                paths,
                occurrences: locations.len() as u64,
                find_time: Some(find_time),
                locate_time,
            },
            locations,
        }
    }

    fn run_streaming(&self, patterns: &[Pattern<'_>]) -> QueryOutcome {
        self.counters.mark_locate_started();

        let ((locations, matched, paths), locate_time) = timed(|| {
            let mut locations = Vec::new();
            let mut matched = 0usize;
            let mut paths = 0u64;
            for pattern in patterns {
                let range = self.index.find(pattern);
                if range.is_empty() {
                    self.counters.record_unmatched(1);
                    continue;
                }

                let count = self.index.count(&range);
                self.counters.add_paths(count);
                paths += count;
                matched += 1;

                let found = self.index.locate(&range, self.config.dedup);
                self.counters.record_located(found.len());
                locations.extend(found);
            }
            (locations, matched, paths)
        });

        QueryOutcome {
            stats: QueryStats {
                patterns: patterns.len(),
                matched_patterns: matched,
                paths,
                occurrences: locations.len() as u64,
                find_time: None,
                locate_time,
            },
            locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::io::Read;

    use super::*;
    use crate::index::{IndexError, SuffixIndex};
    use crate::seeding::{generate, SeedingStrategy};

    /// Index answering from a fixed table, counting the calls it receives
    struct TableIndex {
        entries: Vec<(&'static [u8], Vec<Location>)>,
        located: RefCell<Vec<MatchRange>>,
        finds: Cell<usize>,
    }

    impl TableIndex {
        fn new(entries: Vec<(&'static [u8], Vec<Location>)>) -> Self {
            Self {
                entries,
                located: RefCell::new(Vec::new()),
                finds: Cell::new(0),
            }
        }
    }

    impl SeedIndex for TableIndex {
        fn load<R: Read>(_reader: R) -> Result<Self, IndexError> {
            Ok(Self::new(Vec::new()))
        }

        fn find(&self, pattern: &[u8]) -> MatchRange {
            self.finds.set(self.finds.get() + 1);
            match self.entries.iter().position(|(p, _)| *p == pattern) {
                Some(i) if !self.entries[i].1.is_empty() => {
                    MatchRange::new(i as u64, i as u64 + 1)
                }
                _ => MatchRange::empty(),
            }
        }

        fn count(&self, range: &MatchRange) -> u64 {
            self.entries[range.start() as usize].1.len() as u64
        }

        fn locate(&self, range: &MatchRange, dedup: bool) -> Vec<Location> {
            assert!(!range.is_empty(), "empty ranges must never be located");
            self.located.borrow_mut().push(*range);
            let mut found = self.entries[range.start() as usize].1.clone();
            if dedup {
                found.dedup();
            }
            found
        }
    }

    fn make_table() -> TableIndex {
        TableIndex::new(vec![
            (b"ACGT".as_slice(), vec![Location::new(3, 10), Location::new(3, 15)]),
            (b"TTTT".as_slice(), vec![]),
            (b"GGCC".as_slice(), vec![Location::new(7, 2)]),
        ])
    }

    fn seeds_of(seeds: &[&'static str]) -> Vec<&'static [u8]> {
        seeds.iter().map(|&s| s.as_bytes()).collect()
    }

    fn config(mode: QueryMode) -> QueryConfig {
        QueryConfig { mode, dedup: false }
    }

    #[test]
    fn test_two_phase_locates_every_match_in_order() {
        let index = make_table();
        let pipeline = QueryPipeline::new(&index, config(QueryMode::TwoPhase));
        let patterns = seeds_of(&["ACGT", "TTTT", "GGCC"]);

        let outcome = pipeline.run(&patterns);
        assert_eq!(
            outcome.locations,
            vec![
                Location::new(3, 10),
                Location::new(3, 15),
                Location::new(7, 2)
            ]
        );
        assert_eq!(outcome.stats.patterns, 3);
        assert_eq!(outcome.stats.matched_patterns, 2);
        assert_eq!(outcome.stats.paths, 3);
        assert_eq!(outcome.stats.occurrences, 3);
        assert!(outcome.stats.find_time.is_some());
        assert_eq!(index.located.borrow().len(), 2);
    }

    #[test]
    fn test_streaming_matches_two_phase() {
        let patterns = seeds_of(&["GGCC", "ACGT", "TTTT", "ACGT", "AAAA"]);

        let two_phase_index = make_table();
        let two_phase = QueryPipeline::new(&two_phase_index, config(QueryMode::TwoPhase))
            .run(&patterns);

        let streaming_index = make_table();
        let streaming = QueryPipeline::new(&streaming_index, config(QueryMode::Streaming))
            .run(&patterns);

        assert_eq!(two_phase.locations, streaming.locations);
        assert_eq!(two_phase.stats.matched_patterns, streaming.stats.matched_patterns);
        assert_eq!(two_phase.stats.paths, streaming.stats.paths);
        assert!(streaming.stats.find_time.is_none());
    }

    #[test]
    fn test_empty_range_contributes_nothing() {
        for mode in [QueryMode::TwoPhase, QueryMode::Streaming] {
            let index = make_table();
            let pipeline = QueryPipeline::new(&index, config(mode));
            let patterns = seeds_of(&["TTTT"]);

            let outcome = pipeline.run(&patterns);
            assert!(outcome.locations.is_empty());
            assert_eq!(pipeline.counters().occurrences_found(), 0);
            assert_eq!(pipeline.counters().patterns_done(), 1);
            assert!(index.located.borrow().is_empty());
        }
    }

    #[test]
    fn test_counters_complete_after_run() {
        for mode in [QueryMode::TwoPhase, QueryMode::Streaming] {
            let index = make_table();
            let counters = Arc::new(RunCounters::new());
            let pipeline =
                QueryPipeline::with_counters(&index, config(mode), Arc::clone(&counters));
            let patterns = seeds_of(&["ACGT", "TTTT", "GGCC", "CCCC"]);

            pipeline.run(&patterns);

            let report = counters.report();
            assert_eq!(report.total, 4);
            assert_eq!(report.done, report.total);
            assert_eq!(report.occurrences, 3);
            assert_eq!(report.paths, 3);
            assert_eq!(report.percent, Some(100));
        }
    }

    #[test]
    fn test_no_patterns() {
        let index = make_table();
        let pipeline = QueryPipeline::new(&index, QueryConfig::default());
        let outcome = pipeline.run(&[]);
        assert!(outcome.locations.is_empty());
        assert_eq!(pipeline.counters().report().percent, None);
    }

    #[test]
    fn test_find_called_once_per_pattern() {
        let index = make_table();
        let pipeline = QueryPipeline::new(&index, QueryConfig::default());
        let patterns = seeds_of(&["ACGT", "ACGT", "TTTT"]);
        pipeline.run(&patterns);
        assert_eq!(index.finds.get(), 3);
    }

    #[test]
    fn test_dedup_is_forwarded() {
        let index = TableIndex::new(vec![(
            b"ACGT".as_slice(),
            vec![Location::new(1, 5), Location::new(1, 5)],
        )]);
        let patterns = seeds_of(&["ACGT"]);

        let plain = QueryPipeline::new(&index, QueryConfig::default()).run(&patterns);
        assert_eq!(plain.locations.len(), 2);

        let dedup_config = QueryConfig {
            dedup: true,
            ..QueryConfig::default()
        };
        let deduped = QueryPipeline::new(&index, dedup_config).run(&patterns);
        assert_eq!(deduped.locations, vec![Location::new(1, 5)]);
    }

    #[test]
    fn test_seeds_against_suffix_index() {
        let index = SuffixIndex::from_contigs(vec![(3u64, "chr3", "ACGTACGTTT")]);
        let sequences = vec![b"ACGTACGT".to_vec()];
        let patterns: Vec<&[u8]> =
            generate(&sequences, 4, SeedingStrategy::NonOverlapping).collect();

        let outcome = QueryPipeline::new(&index, QueryConfig::default()).run(&patterns);
        // Each of the two identical seeds occurs twice
        assert_eq!(
            outcome.locations,
            vec![
                Location::new(3, 0),
                Location::new(3, 4),
                Location::new(3, 0),
                Location::new(3, 4)
            ]
        );
    }

    #[test]
    fn test_rerun_is_identical() {
        let index = SuffixIndex::from_contigs(vec![
            (0u64, "a", "GATTACAGATTACA"),
            (1u64, "b", "TTACAGG"),
        ]);
        let sequences = vec![b"GATTACA".to_vec(), b"ACAGG".to_vec()];
        let patterns: Vec<&[u8]> =
            generate(&sequences, 3, SeedingStrategy::GreedyOverlapping).collect();

        let first = QueryPipeline::new(&index, QueryConfig::default()).run(&patterns);
        let second = QueryPipeline::new(&index, QueryConfig::default()).run(&patterns);
        assert_eq!(first.locations, second.locations);
        assert!(!first.locations.is_empty());
    }
}
