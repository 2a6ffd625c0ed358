//! Decode errors
//!
//! Every variant means the device answered with data that does not match
//! the documented layout; callers report them as "bad response data".

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{record}: payload too short, need {expected} bytes, got {actual}")]
    TooShort {
        record: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{record}: expected {expected} fields, got {actual}")]
    FieldCount {
        record: &'static str,
        expected: usize,
        actual: usize,
    },
}
