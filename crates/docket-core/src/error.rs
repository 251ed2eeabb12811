/// Why a draft was rejected. `add` reports exactly one of these so the
/// caller can tell a blank required field from a malformed date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDateFormat(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("record index {index} out of range for {len} record(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to persist records: {0:#}")]
    Persistence(anyhow::Error),
}
