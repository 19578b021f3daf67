/// Seams of the report pipeline
///
/// This module provides trait-based abstractions for:
/// - Line parsing (one parser per log family)
/// - Log loading (directory on disk, in-memory fixtures)
/// - Rendering (CSV tables, PNG charts, in-memory capture)
///
/// The pipeline is generic over all three so tests can swap any of them.
use crate::error::ParseError;
use crate::record::{MetricKind, Record};
use crate::table::{MetricTable, SpeedupTable};
use anyhow::Result;
use std::path::PathBuf;

// ============================================================================
// Line Parser Trait
// ============================================================================

/// Maps a single log line to at most one record
pub trait LineParser {
    /// Metric family this parser produces
    fn metric_kind(&self) -> MetricKind;

    /// Parse one physical line
    ///
    /// # Returns
    /// - `Ok(Some(record))` for a measurement line
    /// - `Ok(None)` for noise (headers, blank lines, other tools' output)
    /// - `Err(_)` when the line looked like a measurement but could not be used
    fn parse_line(&self, line: &str) -> Result<Option<Record>, ParseError>;

    /// Lazily parse a whole blob, skipping every line that yields no record
    ///
    /// The iterator is `Clone`, so the sequence can be restarted; the text is
    /// never modified.
    fn parse<'a>(&'a self, text: &'a str) -> RecordIter<'a, Self>
    where
        Self: Sized,
    {
        RecordIter {
            parser: self,
            lines: text.lines(),
        }
    }

    /// Eagerly parse a blob and keep count of what was skipped
    fn parse_with_stats(&self, text: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        for line in text.lines() {
            match self.parse_line(line) {
                Ok(Some(record)) => outcome.records.push(record),
                Ok(None) => outcome.noise_lines += 1,
                Err(e @ ParseError::UnparseableLine { .. }) => {
                    tracing::debug!("Skipping line ({}): {}", e, line);
                    outcome.unparseable_lines += 1;
                }
                Err(e @ ParseError::MalformedRecord { .. }) => {
                    tracing::debug!("Dropping record ({}): {}", e, line);
                    outcome.malformed_records += 1;
                }
            }
        }

        outcome
    }

    /// Get the name/identifier of this parser (for reporting)
    fn name(&self) -> &str;
}

/// Lazy record sequence over the lines of a text blob
pub struct RecordIter<'a, P: ?Sized> {
    parser: &'a P,
    lines: std::str::Lines<'a>,
}

impl<P: ?Sized> Clone for RecordIter<'_, P> {
    fn clone(&self) -> Self {
        Self {
            parser: self.parser,
            lines: self.lines.clone(),
        }
    }
}

impl<P: LineParser + ?Sized> Iterator for RecordIter<'_, P> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        for line in self.lines.by_ref() {
            match self.parser.parse_line(line) {
                Ok(Some(record)) => return Some(record),
                Ok(None) => {}
                Err(e) => tracing::debug!("Skipping line ({}): {}", e, line),
            }
        }
        None
    }
}

/// Records from one blob plus the lines that did not make it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub records: Vec<Record>,
    pub noise_lines: usize,
    pub unparseable_lines: usize,
    pub malformed_records: usize,
}

// ============================================================================
// Log Source Trait
// ============================================================================

/// Supplies the raw text of each metric family's log
pub trait LogSource: Send + Sync {
    /// Load the full log text for a family
    ///
    /// # Returns
    /// - `Ok(Some(text))` when the log exists
    /// - `Ok(None)` when it is missing (reported as a warning, not an error)
    fn load(&self, kind: MetricKind) -> Result<Option<String>>;

    /// Get the source name (for reporting)
    fn name(&self) -> &str;
}

// ============================================================================
// Render Sink Trait
// ============================================================================

/// Receives finished tables and turns them into artifacts
///
/// Implementations produce one artifact per (metric, matrix size) grouping
/// and return what they wrote.
pub trait RenderSink {
    fn render_metric(&mut self, table: &MetricTable) -> Result<Vec<PathBuf>>;

    fn render_speedup(&mut self, table: &SpeedupTable) -> Result<Vec<PathBuf>>;

    /// Get the name/identifier of this sink (for reporting)
    fn name(&self) -> &str;
}
