use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("precision must lie strictly between 0 and 1, got {0}")]
    PrecisionOutOfRange(f64),
    #[error("{name} must be positive, got {value}")]
    NonPositiveOption { name: &'static str, value: f64 },
    #[error("search depth must be at least 1")]
    ZeroSearchDepth,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("target must be a positive integer, got {0}")]
    InvalidTarget(i64),
    #[error("seed must be a digit between 1 and 9, got {0}")]
    InvalidSeed(u32),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
