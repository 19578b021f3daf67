/// Canonical record shape shared by every log parser
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Matrix-multiplication variant a measurement belongs to
///
/// The cache and CPU parsers only ever produce the four known variants or
/// `Unknown`. The execution-time parser keeps any bracketed label it does not
/// recognise verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Implementation {
    Aligned,
    Blocked,
    Naive,
    Unrolled,
    Unknown,
    Other(String),
}

impl Implementation {
    /// The closed set, in tag-matching priority order
    pub const KNOWN: [Implementation; 4] = [
        Implementation::Aligned,
        Implementation::Blocked,
        Implementation::Naive,
        Implementation::Unrolled,
    ];

    /// Map an exact (case-sensitive) label onto a variant
    pub fn from_label(label: &str) -> Self {
        match label {
            "Aligned" => Self::Aligned,
            "Blocked" => Self::Blocked,
            "Naive" => Self::Naive,
            "Unrolled" => Self::Unrolled,
            "Unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Aligned => "Aligned",
            Self::Blocked => "Blocked",
            Self::Naive => "Naive",
            Self::Unrolled => "Unrolled",
            Self::Unknown => "Unknown",
            Self::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown | Self::Other(_))
    }
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Implementation> for String {
    fn from(implementation: Implementation) -> Self {
        implementation.as_str().to_string()
    }
}

impl From<String> for Implementation {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// Metric family of an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricKind {
    L1MissPercent,
    LLCMissPercent,
    CpuUtilizationPercent,
    ExecutionTimeSeconds,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::L1MissPercent,
        MetricKind::LLCMissPercent,
        MetricKind::CpuUtilizationPercent,
        MetricKind::ExecutionTimeSeconds,
    ];

    pub fn is_percentage(self) -> bool {
        !matches!(self, Self::ExecutionTimeSeconds)
    }

    /// Output file stem for one chart of this family, `_N{size}` is appended
    pub fn chart_stem(self) -> &'static str {
        match self {
            Self::L1MissPercent => "l1_dcache_percentage",
            Self::LLCMissPercent => "llc_miss_percentage",
            Self::CpuUtilizationPercent => "cpu_utilization",
            Self::ExecutionTimeSeconds => "exec_time",
        }
    }

    pub fn chart_title(self) -> &'static str {
        match self {
            Self::L1MissPercent => "L1-dcache Miss %",
            Self::LLCMissPercent => "LLC-load Miss %",
            Self::CpuUtilizationPercent => "CPU Utilization",
            Self::ExecutionTimeSeconds => "Execution Time vs. Threads",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Self::L1MissPercent => "L1-dcache Misses (%)",
            Self::LLCMissPercent => "LLC-load Misses (%)",
            Self::CpuUtilizationPercent => "CPU Utilization (%)",
            Self::ExecutionTimeSeconds => "Time (sec)",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::L1MissPercent => "L1 miss %",
            Self::LLCMissPercent => "LLC miss %",
            Self::CpuUtilizationPercent => "CPU utilization %",
            Self::ExecutionTimeSeconds => "execution time (s)",
        };
        f.write_str(name)
    }
}

/// One observation extracted from a log line
///
/// Fields are private: a record only comes out of [`Record::new`], which
/// enforces the invariants, and is never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    implementation: Implementation,
    matrix_size: Option<u32>,
    thread_count: u32,
    metric_kind: MetricKind,
    value: f64,
}

impl Record {
    /// Build a record, rejecting values that break its invariants
    ///
    /// - `thread_count` must be at least 1
    /// - `matrix_size`, when present, must be positive
    /// - percentages must lie in `[0, 100]`, execution times must be `>= 0`
    pub fn new(
        implementation: Implementation,
        matrix_size: Option<u32>,
        thread_count: u32,
        metric_kind: MetricKind,
        value: f64,
    ) -> Result<Self, ParseError> {
        if thread_count < 1 {
            return Err(ParseError::malformed(
                "thread_count",
                format!("must be >= 1, got {}", thread_count),
            ));
        }

        if matrix_size == Some(0) {
            return Err(ParseError::malformed("matrix_size", "must be > 0"));
        }

        if !value.is_finite() {
            return Err(ParseError::malformed(
                "value",
                format!("must be finite, got {}", value),
            ));
        }

        if metric_kind.is_percentage() {
            if !(0.0..=100.0).contains(&value) {
                return Err(ParseError::malformed(
                    "value",
                    format!("percentage {} outside [0, 100]", value),
                ));
            }
        } else if value < 0.0 {
            return Err(ParseError::malformed(
                "value",
                format!("execution time {} is negative", value),
            ));
        }

        Ok(Self {
            implementation,
            matrix_size,
            thread_count,
            metric_kind,
            value,
        })
    }

    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    pub fn matrix_size(&self) -> Option<u32> {
        self.matrix_size
    }

    pub fn thread_count(&self) -> u32 {
        self.thread_count
    }

    pub fn metric_kind(&self) -> MetricKind {
        self.metric_kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_percentage_record() {
        let record = Record::new(
            Implementation::Aligned,
            Some(1024),
            2,
            MetricKind::L1MissPercent,
            65.23,
        )
        .unwrap();

        assert_eq!(record.implementation(), &Implementation::Aligned);
        assert_eq!(record.matrix_size(), Some(1024));
        assert_eq!(record.thread_count(), 2);
        assert_eq!(record.value(), 65.23);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = Record::new(
            Implementation::Naive,
            Some(512),
            0,
            MetricKind::ExecutionTimeSeconds,
            1.0,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ParseError::MalformedRecord {
                field: "thread_count",
                ..
            }
        ));
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(Record::new(Implementation::Naive, None, 1, MetricKind::CpuUtilizationPercent, 100.0).is_ok());
        assert!(Record::new(Implementation::Naive, None, 1, MetricKind::CpuUtilizationPercent, 0.0).is_ok());
        assert!(Record::new(Implementation::Naive, None, 1, MetricKind::CpuUtilizationPercent, 100.5).is_err());
        assert!(Record::new(Implementation::Naive, None, 1, MetricKind::LLCMissPercent, -0.1).is_err());
    }

    #[test]
    fn test_execution_time_not_capped() {
        // Times above 100 are fine, only negatives fail
        assert!(Record::new(Implementation::Blocked, Some(4096), 1, MetricKind::ExecutionTimeSeconds, 250.0).is_ok());
        assert!(Record::new(Implementation::Blocked, Some(4096), 1, MetricKind::ExecutionTimeSeconds, 0.0).is_ok());
        assert!(Record::new(Implementation::Blocked, Some(4096), 1, MetricKind::ExecutionTimeSeconds, -1.0).is_err());
    }

    #[test]
    fn test_zero_matrix_size_rejected() {
        assert!(Record::new(Implementation::Naive, Some(0), 1, MetricKind::L1MissPercent, 1.0).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(Record::new(Implementation::Naive, None, 1, MetricKind::ExecutionTimeSeconds, f64::NAN).is_err());
    }

    #[test]
    fn test_implementation_labels() {
        assert_eq!(Implementation::from_label("Blocked"), Implementation::Blocked);
        assert_eq!(
            Implementation::from_label("blocked"),
            Implementation::Other("blocked".to_string())
        );
        assert_eq!(Implementation::Other("Strassen".to_string()).to_string(), "Strassen");
        assert!(Implementation::Unrolled.is_known());
        assert!(!Implementation::Unknown.is_known());
    }

    #[test]
    fn test_implementation_serializes_as_label() {
        let json = serde_json::to_string(&Implementation::Aligned).unwrap();
        assert_eq!(json, "\"Aligned\"");

        let back: Implementation = serde_json::from_str("\"Strassen\"").unwrap();
        assert_eq!(back, Implementation::Other("Strassen".to_string()));
    }
}
