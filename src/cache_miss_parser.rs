/// Parser for `perf stat` cache-miss output
///
/// Expected line shape (one per run, prefixed by the run's log file):
///
/// ```text
/// ./matmul_aligned_parallel_N1024_T2.log:     1,078,254,424  L1-dcache-load-misses:u  #   65.23% of all L1-dcache accesses
/// ./matmul_aligned_parallel_N1024_T2.log:           367,649  LLC-load-misses:u        #    0.04% of all LL-cache accesses
/// ```
use crate::error::ParseError;
use crate::filename_tags::FileTags;
use crate::record::{MetricKind, Record};
use crate::traits::LineParser;
use memchr::memmem;
use once_cell::sync::Lazy;
use regex::Regex;

static PERCENTAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.]+)%").expect("static percentage regex"));

/// Which cache level a parser instance extracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheLevel {
    L1,
    Llc,
}

impl CacheLevel {
    /// perf event name that must precede the `#` comment
    pub fn marker(self) -> &'static str {
        match self {
            Self::L1 => "L1-dcache-load-misses",
            Self::Llc => "LLC-load-misses",
        }
    }

    pub fn metric_kind(self) -> MetricKind {
        match self {
            Self::L1 => MetricKind::L1MissPercent,
            Self::Llc => MetricKind::LLCMissPercent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheMissParser {
    level: CacheLevel,
    marker: memmem::Finder<'static>,
}

impl CacheMissParser {
    pub fn new(level: CacheLevel) -> Self {
        Self {
            level,
            marker: memmem::Finder::new(level.marker()),
        }
    }

    pub fn l1() -> Self {
        Self::new(CacheLevel::L1)
    }

    pub fn llc() -> Self {
        Self::new(CacheLevel::Llc)
    }

    pub fn level(&self) -> CacheLevel {
        self.level
    }
}

impl LineParser for CacheMissParser {
    fn metric_kind(&self) -> MetricKind {
        self.level.metric_kind()
    }

    fn parse_line(&self, line: &str) -> Result<Option<Record>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        // Measurement on the left of the first '#', perf's comment up to the next one
        let mut parts = line.split('#');
        let measurement = parts.next().unwrap_or_default();
        let Some(comment) = parts.next() else {
            return Ok(None);
        };

        if self.marker.find(measurement.as_bytes()).is_none() {
            return Ok(None);
        }

        let Some(percent) = extract_percentage(comment)? else {
            return Err(ParseError::unparseable(format!(
                "no percentage after {} comment",
                self.level.marker()
            )));
        };

        let tags = FileTags::from_line_prefix(measurement)?;
        Record::new(
            tags.implementation,
            tags.matrix_size,
            tags.thread_count,
            self.metric_kind(),
            percent,
        )
        .map(Some)
    }

    fn name(&self) -> &str {
        match self.level {
            CacheLevel::L1 => "l1-cache-miss",
            CacheLevel::Llc => "llc-cache-miss",
        }
    }
}

/// First `<number>%` in `text`
///
/// `Ok(None)` when there is no percentage at all, an error when the digits
/// before `%` are not a number (e.g. `1.2.3%`).
pub(crate) fn extract_percentage(text: &str) -> Result<Option<f64>, ParseError> {
    let Some(caps) = PERCENTAGE.captures(text) else {
        return Ok(None);
    };

    let literal = &caps[1];
    literal
        .parse::<f64>()
        .map(Some)
        .map_err(|e| ParseError::unparseable(format!("percentage '{}': {}", literal, e)))
}
