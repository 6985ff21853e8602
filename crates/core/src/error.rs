#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid tick interval: {0}")]
    InvalidTickInterval(String),
    #[error("invalid patient id '{value}': {source}")]
    InvalidPatientId {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("invalid simulator seed: {0}")]
    InvalidSeed(std::num::ParseIntError),
    #[error("invalid boolean flag: {0}")]
    InvalidFlag(String),
    #[error("unknown metric kind: {0}")]
    UnknownMetricKind(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
