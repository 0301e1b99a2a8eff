use chrono::NaiveTime;
use thiserror::Error;

/// Errors raised while turning CSV rows into daily aggregates. Any of these
/// aborts the batch run; rows are never silently skipped.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed time value: {value}")]
    MalformedTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("unknown activity label: {0}")]
    UnknownActivity(String),

    #[error("interval ends before it starts: {start} > {end}")]
    NegativeDuration { start: NaiveTime, end: NaiveTime },

    #[error("malformed CSV row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

/// Errors raised on the query path. Invalid kinds become client errors at
/// the HTTP boundary; store failures become server errors.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid activity type: {0}")]
    InvalidActivityKind(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
