use thiserror::Error;

/// A single chart could not be built. Shown inline in place of the chart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("no numeric values in column {0}")]
    NoData(&'static str),

    #[error("non-finite value while building {0}")]
    NonFinite(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
