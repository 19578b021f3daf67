/// Parser for VTune threading summaries grepped out of per-run logs
///
/// ```text
/// ./matmul_aligned_parallel_N1024_T2_threading.log:Effective CPU Utilization: 12.0% (1.917 out of 16 logical CPUs)
/// ```
use crate::cache_miss_parser::extract_percentage;
use crate::error::ParseError;
use crate::filename_tags::FileTags;
use crate::record::{MetricKind, Record};
use crate::traits::LineParser;
use memchr::memmem;

pub const CPU_UTILIZATION_MARKER: &str = "Effective CPU Utilization:";

#[derive(Debug, Clone)]
pub struct CpuUtilizationParser {
    marker: memmem::Finder<'static>,
}

impl CpuUtilizationParser {
    pub fn new() -> Self {
        Self {
            marker: memmem::Finder::new(CPU_UTILIZATION_MARKER),
        }
    }
}

impl Default for CpuUtilizationParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser for CpuUtilizationParser {
    fn metric_kind(&self) -> MetricKind {
        MetricKind::CpuUtilizationPercent
    }

    fn parse_line(&self, line: &str) -> Result<Option<Record>, ParseError> {
        let line = line.trim();
        let Some(pos) = self.marker.find(line.as_bytes()) else {
            return Ok(None);
        };

        let label = &line[..pos];
        let reading = &line[pos + CPU_UTILIZATION_MARKER.len()..];

        let Some(percent) = extract_percentage(reading)? else {
            return Err(ParseError::unparseable("no percentage after CPU utilization marker"));
        };

        let tags = FileTags::from_line_prefix(label)?;
        Record::new(
            tags.implementation,
            tags.matrix_size,
            tags.thread_count,
            MetricKind::CpuUtilizationPercent,
            percent,
        )
        .map(Some)
    }

    fn name(&self) -> &str {
        "cpu-utilization"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Implementation;

    #[test]
    fn test_parse_threading_line() {
        let line = "./matmul_aligned_parallel_N1024_T2_threading.log:Effective CPU Utilization: 12.0% (1.917 out of 16 logical CPUs)";
        let record = CpuUtilizationParser::new().parse_line(line).unwrap().unwrap();

        assert_eq!(record.implementation(), &Implementation::Aligned);
        assert_eq!(record.matrix_size(), Some(1024));
        assert_eq!(record.thread_count(), 2);
        assert_eq!(record.value(), 12.0);
    }

    #[test]
    fn test_lines_without_marker_skipped() {
        let parser = CpuUtilizationParser::new();
        assert_eq!(parser.parse_line("Elapsed Time: 3.2s").unwrap(), None);
        assert_eq!(parser.parse_line("").unwrap(), None);
    }

    #[test]
    fn test_malformed_percentage_is_line_error() {
        let parser = CpuUtilizationParser::new();
        assert!(parser
            .parse_line("naive_N512.log:Effective CPU Utilization: n/a")
            .is_err());
        assert!(parser
            .parse_line("naive_N512.log:Effective CPU Utilization: 1..2% (x)")
            .is_err());
    }

    #[test]
    fn test_out_of_range_is_malformed() {
        let err = CpuUtilizationParser::new()
            .parse_line("naive_N512.log:Effective CPU Utilization: 120.0% (x)")
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecord { .. }));
    }

    #[test]
    fn test_bad_line_does_not_stop_blob() {
        let text = "\
naive_N512_T4.log:Effective CPU Utilization: garbage
naive_N512_T8.log:Effective CPU Utilization: 47.6% (7.6 out of 16 logical CPUs)
vtune: Executing actions 100 % done
";
        let parser = CpuUtilizationParser::new();
        let outcome = parser.parse_with_stats(text);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].thread_count(), 8);
        assert_eq!(outcome.unparseable_lines, 1);
        assert_eq!(outcome.noise_lines, 1);
    }
}
