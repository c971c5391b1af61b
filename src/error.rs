use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("failed to read config file")]
    ReadFile,
    #[display("failed to parse config: {reason}")]
    Parse { reason: String },
    #[display("invalid config: {field}")]
    Validation { field: String },
}

#[derive(Debug, Display, Error)]
pub enum LoadError {
    #[display("failed to read price series")]
    ReadFile,
    #[display("failed to parse price series: {reason}")]
    Parse { reason: String },
    #[display("unsupported input format: {format}")]
    UnsupportedFormat { format: String },
}

#[derive(Debug, Display, Error)]
pub enum ReportError {
    #[display("failed to serialize overlay")]
    Serialize,
    #[display("failed to write overlay")]
    Write,
}

#[derive(Debug, Display, Error)]
pub enum IndicatorError {
    #[display("empty price series")]
    EmptySeries,
    #[display("invalid parameter: {name}")]
    InvalidParameter { name: String },
}
