/// Detects which metric family a benchmark log line belongs to
use crate::cache_miss_parser::CacheLevel;
use crate::cpu_util_parser::CPU_UTILIZATION_MARKER;
use crate::record::MetricKind;
use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;

/// Family markers, indexed in the same order as `FAMILY_KINDS`
static FAMILY_MARKERS: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new([
        CacheLevel::L1.marker(),
        CacheLevel::Llc.marker(),
        CPU_UTILIZATION_MARKER,
    ])
    .expect("static family markers")
});

const FAMILY_KINDS: [MetricKind; 3] = [
    MetricKind::L1MissPercent,
    MetricKind::LLCMissPercent,
    MetricKind::CpuUtilizationPercent,
];

/// `[Label] ... time=...`
static TIMING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[[^\]]*\].*\btime\s*=").expect("static timing regex"));

pub struct LogFormatDetector;

impl LogFormatDetector {
    /// Detect the metric family of a single line, `None` for noise
    pub fn detect(log_line: &str) -> Option<MetricKind> {
        if let Some(mat) = FAMILY_MARKERS.find(log_line) {
            return Some(FAMILY_KINDS[mat.pattern().as_usize()]);
        }

        if TIMING_LINE.is_match(log_line) {
            return Some(MetricKind::ExecutionTimeSeconds);
        }

        None
    }

    /// Most frequent family over all lines of a blob
    ///
    /// Ties go to the family listed first in `MetricKind::ALL`.
    pub fn detect_dominant(text: &str) -> Option<MetricKind> {
        let mut counts = [0usize; 4];
        for kind in text.lines().filter_map(Self::detect) {
            counts[family_index(kind)] += 1;
        }

        let (idx, &count) = counts
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, count)| **count)?;

        (count > 0).then_some(MetricKind::ALL[idx])
    }
}

fn family_index(kind: MetricKind) -> usize {
    match kind {
        MetricKind::L1MissPercent => 0,
        MetricKind::LLCMissPercent => 1,
        MetricKind::CpuUtilizationPercent => 2,
        MetricKind::ExecutionTimeSeconds => 3,
    }
}
