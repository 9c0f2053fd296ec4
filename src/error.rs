use thiserror::Error;

#[derive(Error, Debug)]
pub enum WindroseError {
    /// Interval generation would divide by zero, yield non-finite bounds or too many intervals.
    #[error("invalid range [{start}, {end}]: {reason}")]
    InvalidRange { start: f64, end: f64, reason: String },
    #[error("{directions} x {speeds} histogram cells exceed the limit of {limit}")]
    MatrixTooLarge { directions: usize, speeds: usize, limit: usize },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl WindroseError {
    pub(crate) fn invalid_range(start: f64, end: f64, reason: impl Into<String>) -> Self {
        WindroseError::InvalidRange { start, end, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, WindroseError>;
