use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An aggregate was requested over zero rows.
    #[error("no input rows to compute {what}")]
    EmptyInput { what: &'static str },

    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Returns `true` when the error means there was nothing to aggregate.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
