use thiserror::Error;

/// Why a matcher declined a line
///
/// Both variants mean "try the next matcher" to the dispatcher. They are kept
/// apart so diagnostics can tell a wrong shape from a shape that matched with
/// a field that would not convert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A literal token or capture was not where the template expects it
    #[error("line does not fit the template")]
    Mismatch,

    /// The template fit but a captured value could not be converted
    #[error("field `{field}` could not be converted from {value:?}")]
    Conversion { field: &'static str, value: String },
}

impl MatchError {
    pub(crate) fn conversion(field: &'static str, value: &str) -> Self {
        Self::Conversion {
            field,
            value: value.to_string(),
        }
    }

    /// True when the line had the right shape but a bad value
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }
}

pub type MatchResult<T> = Result<T, MatchError>;
