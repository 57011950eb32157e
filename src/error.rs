use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid lat/lng format: {0:?}")]
    InvalidLatLng(String),

    #[error("invalid timestamp {input:?}: {source}")]
    InvalidTimestamp {
        input: String,
        source: chrono::ParseError,
    },

    #[error("segment #{index} has none of `timelinePath`, `visit`, `activity` or `timelineMemory`")]
    UnknownSegmentKind { index: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    // Always a caller bug: interpolation is only defined inside the bracket.
    #[error("timestamp {timestamp} does not fall in the range [{start}, {end}]")]
    OutOfRange {
        timestamp: DateTime<Utc>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
