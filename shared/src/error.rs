use thiserror::Error;

/// Reasons a draft can't be turned into a write payload
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("category line {line} has no category")]
    MissingCategory { line: usize },

    #[error("category line {line} has no amount")]
    MissingAmount { line: usize },

    #[error("converted amount ({code}) is required")]
    MissingConvertedAmount { code: String },

    #[error("at least one category line is required")]
    NoCategoryLines,

    #[error("balance adjustments are not edited from this form")]
    UnsupportedType,

    #[error("cannot update a record without an id")]
    MissingRecordId,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),
}
