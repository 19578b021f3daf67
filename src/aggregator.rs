/// Speedup derivation: joins single-thread baselines against multi-thread timings
///
/// For every (implementation, matrix_size) key the first `thread_count == 1`
/// execution-time record is the baseline, and each other-thread-count record
/// of that key gets `speedup = baseline_time / time`.
use crate::record::{Implementation, MetricKind, Record};
use crate::table::{SpeedupRecord, SpeedupTable};
use rustc_hash::FxHashMap;

type GroupKey = (Implementation, Option<u32>);

/// Derive the speedup table from execution-time records
///
/// Records of other metric kinds are ignored. Keys without a baseline are
/// listed in `missing_baselines` and contribute no rows; a run that took zero
/// seconds contributes no row either.
pub fn derive_speedups(records: &[Record]) -> SpeedupTable {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: FxHashMap<GroupKey, Vec<&Record>> = FxHashMap::default();

    for record in records
        .iter()
        .filter(|r| r.metric_kind() == MetricKind::ExecutionTimeSeconds)
    {
        let key = (record.implementation().clone(), record.matrix_size());
        groups
            .entry(key)
            .or_insert_with_key(|key| {
                order.push(key.clone());
                Vec::new()
            })
            .push(record);
    }

    let mut table = SpeedupTable::default();

    for key in order {
        let Some(group) = groups.get(&key) else {
            continue;
        };

        let Some(baseline) = group.iter().find(|r| r.thread_count() == 1) else {
            tracing::debug!(
                "No single-thread baseline for {} (N={:?}), skipping {} runs",
                key.0,
                key.1,
                group.len()
            );
            table.missing_baselines.push(key);
            continue;
        };

        for record in group.iter().filter(|r| r.thread_count() != 1) {
            if record.value() == 0.0 {
                tracing::debug!(
                    "Zero execution time for {} (N={:?}, T={}), speedup undefined",
                    key.0,
                    key.1,
                    record.thread_count()
                );
                continue;
            }

            table.rows.push(SpeedupRecord {
                implementation: key.0.clone(),
                matrix_size: key.1,
                thread_count: record.thread_count(),
                speedup: baseline.value() / record.value(),
            });
        }
    }

    table.rows.sort_by(|a, b| {
        (&a.implementation, a.matrix_size, a.thread_count).cmp(&(
            &b.implementation,
            b.matrix_size,
            b.thread_count,
        ))
    });
    table.missing_baselines.sort();

    table
}
