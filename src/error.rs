use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("unrecognized time window `{value}` (expected one of ALL, 1M, 3M, 6M, 1Y)")]
    InvalidConfiguration { value: String },

    #[error("unrecognized week start day `{value}`")]
    InvalidWeekStart { value: String },

    #[error("invalid date label format `{value}`")]
    InvalidLabelFormat { value: String },
}
