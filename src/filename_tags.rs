/// Tags embedded in benchmark log file names
///
/// perf and VTune prefix every line with the name of the log it came from,
/// e.g. `./matmul_aligned_parallel_N1024_T2.log:`. The name carries the
/// implementation, the matrix size (`_N<digits>`) and the thread count
/// (`_T<digits>`).
use crate::error::ParseError;
use crate::record::Implementation;
use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Lowercase needles, same order as `Implementation::KNOWN`
static IMPLEMENTATION_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["aligned", "blocked", "naive", "unrolled"])
        .expect("static implementation patterns")
});

static SIZE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"_N(\d+)").expect("static size regex"));

static THREAD_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_T(\d+)").expect("static thread regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTags {
    pub implementation: Implementation,
    pub matrix_size: Option<u32>,
    /// Defaults to 1 when the name has no `_T` tag
    pub thread_count: u32,
}

impl FileTags {
    /// Extract tags from the text left of a metric marker
    ///
    /// Only the part before the first `:` is used, reduced to its base name.
    pub fn from_line_prefix(prefix: &str) -> Result<Self, ParseError> {
        Self::from_file_name(base_name(prefix))
    }

    pub fn from_file_name(name: &str) -> Result<Self, ParseError> {
        Ok(Self {
            implementation: implementation_tag(name),
            matrix_size: numeric_tag(&SIZE_TAG, name, "_N")?,
            thread_count: numeric_tag(&THREAD_TAG, name, "_T")?.unwrap_or(1),
        })
    }
}

/// Base name of the file label that opens a log line
pub fn base_name(prefix: &str) -> &str {
    let label = prefix.split(':').next().unwrap_or_default().trim();
    Path::new(label)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(label)
}

/// Case-insensitive substring match against the four known implementations
///
/// When several names occur, the earliest in `Implementation::KNOWN` wins.
pub fn implementation_tag(name: &str) -> Implementation {
    IMPLEMENTATION_MATCHER
        .find_iter(name)
        .map(|mat| mat.pattern().as_usize())
        .min()
        .map(|idx| Implementation::KNOWN[idx].clone())
        .unwrap_or(Implementation::Unknown)
}

fn numeric_tag(pattern: &Regex, name: &str, tag: &str) -> Result<Option<u32>, ParseError> {
    let Some(caps) = pattern.captures(name) else {
        return Ok(None);
    };

    let digits = &caps[1];
    digits
        .parse::<u32>()
        .map(Some)
        .map_err(|e| ParseError::unparseable(format!("{} tag '{}': {}", tag, digits, e)))
}
