use thiserror::Error;

/// Errors raised while turning caller input into SQL fragments.
///
/// Every variant describes bad input, so callers surface all of them as
/// validation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("No data")]
    NoData,

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Field '{0}' cannot be changed")]
    ImmutableField(String),

    #[error("Invalid filter '{param}' for {resource}; acceptable filters: {allowed}")]
    UnknownFilter {
        resource: String,
        param: String,
        allowed: String,
    },

    #[error("Filter '{0}' cannot be empty")]
    EmptyValue(String),

    #[error("Filter '{param}' must be a number, got '{value}'")]
    InvalidNumber { param: String, value: String },

    #[error("'{min_param}' cannot be greater than '{max_param}'")]
    InvalidRange { min_param: String, max_param: String },
}
