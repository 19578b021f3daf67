/// Normalised tables handed to render sinks
use crate::record::{Implementation, MetricKind, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One row of a metric table: {implementation, matrix_size, thread_count, value}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub implementation: Implementation,
    pub matrix_size: Option<u32>,
    pub thread_count: u32,
    pub value: f64,
}

impl From<&Record> for TableRow {
    fn from(record: &Record) -> Self {
        Self {
            implementation: record.implementation().clone(),
            matrix_size: record.matrix_size(),
            thread_count: record.thread_count(),
            value: record.value(),
        }
    }
}

/// All records of one metric family
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    pub metric: MetricKind,
    pub records: Vec<Record>,
}

impl MetricTable {
    pub fn new(metric: MetricKind, records: Vec<Record>) -> Self {
        Self { metric, records }
    }

    pub fn empty(metric: MetricKind) -> Self {
        Self::new(metric, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows(&self) -> Vec<TableRow> {
        self.records.iter().map(TableRow::from).collect()
    }

    /// Distinct matrix sizes, ascending
    ///
    /// Records without a size are left out: they cannot be placed on any chart.
    pub fn sizes(&self) -> Vec<u32> {
        self.records
            .iter()
            .filter_map(Record::matrix_size)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows for one matrix size, sorted by (implementation, thread_count)
    pub fn for_size(&self, size: u32) -> Vec<TableRow> {
        let mut rows: Vec<TableRow> = self
            .records
            .iter()
            .filter(|r| r.matrix_size() == Some(size))
            .map(TableRow::from)
            .collect();
        rows.sort_by(|a, b| {
            (&a.implementation, a.thread_count).cmp(&(&b.implementation, b.thread_count))
        });
        rows
    }
}

/// Speedup of one (implementation, size, thread_count) over its single-thread baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedupRecord {
    pub implementation: Implementation,
    pub matrix_size: Option<u32>,
    pub thread_count: u32,
    pub speedup: f64,
}

/// Output of the aggregator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedupTable {
    /// Sorted by (implementation, matrix_size, thread_count)
    pub rows: Vec<SpeedupRecord>,
    /// Keys whose multi-thread runs were dropped for lack of a baseline
    pub missing_baselines: Vec<(Implementation, Option<u32>)>,
}

impl SpeedupTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sizes(&self) -> Vec<u32> {
        self.rows
            .iter()
            .filter_map(|r| r.matrix_size)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn for_size(&self, size: u32) -> Vec<&SpeedupRecord> {
        self.rows
            .iter()
            .filter(|r| r.matrix_size == Some(size))
            .collect()
    }
}
