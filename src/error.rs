/// Error taxonomy for line-level parsing
///
/// Neither variant ever aborts a whole file: parsers skip the offending line
/// and keep going. A missing single-thread baseline is not an error at all, see
/// `SpeedupTable::missing_baselines`.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A value was extracted but breaks a record invariant
    #[error("malformed record: {field} {reason}")]
    MalformedRecord { field: &'static str, reason: String },

    /// The line looks like a target line but secondary extraction failed
    #[error("unparseable line: {reason}")]
    UnparseableLine { reason: String },
}

impl ParseError {
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            field,
            reason: reason.into(),
        }
    }

    pub fn unparseable(reason: impl Into<String>) -> Self {
        Self::UnparseableLine {
            reason: reason.into(),
        }
    }
}
