/// Parser for the timing lines the benchmark binaries print themselves
///
/// ```text
/// [Aligned] N=1024, threads=2, time=0.679279 sec
/// [Blocked] N=1024, threads=8, block_size=64, time=0.125786 sec
/// ```
///
/// The bracketed label is taken verbatim: unlike the perf/VTune parsers it is
/// not matched against the known implementation names.
use crate::error::ParseError;
use crate::record::{Implementation, MetricKind, Record};
use crate::traits::LineParser;

#[derive(Debug, Clone, Default)]
pub struct ExecutionTimeParser;

impl ExecutionTimeParser {
    pub fn new() -> Self {
        Self
    }
}

/// Fields pulled out of the `key=value` list
#[derive(Debug, Default, PartialEq)]
struct TimingFields {
    matrix_size: Option<u32>,
    thread_count: Option<u32>,
    seconds: Option<f64>,
}

impl LineParser for ExecutionTimeParser {
    fn metric_kind(&self) -> MetricKind {
        MetricKind::ExecutionTimeSeconds
    }

    fn parse_line(&self, line: &str) -> Result<Option<Record>, ParseError> {
        let Some((label, remainder)) = split_label(line.trim()) else {
            return Ok(None);
        };

        let fields = parse_fields(remainder)?;

        let (Some(matrix_size), Some(seconds)) = (fields.matrix_size, fields.seconds) else {
            return Err(ParseError::unparseable(format!(
                "[{}] line without both N and time",
                label
            )));
        };

        Record::new(
            Implementation::from_label(label),
            Some(matrix_size),
            fields.thread_count.unwrap_or(1),
            MetricKind::ExecutionTimeSeconds,
            seconds,
        )
        .map(Some)
    }

    fn name(&self) -> &str {
        "execution-time"
    }
}

/// Split `[Label] rest` into the trimmed label and the rest
fn split_label(line: &str) -> Option<(&str, &str)> {
    let open = line.find('[')?;
    let after_open = &line[open + 1..];
    let close = after_open.find(']')?;
    Some((after_open[..close].trim(), &after_open[close + 1..]))
}

fn parse_fields(remainder: &str) -> Result<TimingFields, ParseError> {
    let mut fields = TimingFields::default();

    for part in remainder.split(',').map(str::trim) {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };

        match key.trim() {
            "N" => fields.matrix_size = Some(parse_int("N", value)?),
            // A garbled thread count keeps the row, it defaults to 1
            "threads" => match parse_int("threads", value) {
                Ok(threads) => fields.thread_count = Some(threads),
                Err(e) => tracing::debug!("Ignoring {}, defaulting to 1 thread", e),
            },
            "time" => {
                // "0.679279 sec" -> "0.679279"
                let number = value
                    .trim()
                    .trim_end_matches(|c: char| c.is_ascii_alphabetic())
                    .trim();
                let seconds = number.parse::<f64>().map_err(|e| {
                    ParseError::unparseable(format!("time '{}': {}", value.trim(), e))
                })?;
                fields.seconds = Some(seconds);
            }
            _ => {}
        }
    }

    Ok(fields)
}

fn parse_int(key: &str, value: &str) -> Result<u32, ParseError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|e| ParseError::unparseable(format!("{} '{}': {}", key, value.trim(), e)))
}
