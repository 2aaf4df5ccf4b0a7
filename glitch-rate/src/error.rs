use crate::threshold::Threshold;
use glitch_rate_common::Time;
use std::path::PathBuf;
use thiserror::Error;

pub type GlitchRateResult<T> = Result<T, GlitchRateError>;

/// Rejected run parameters, raised before any computation begins.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Stride must be positive and finite, got {0}")]
    InvalidStride(Time),
    #[error("Averaging length must be at least one")]
    ZeroAveragingLength,
    #[error("No severity thresholds given")]
    NoThresholds,
    #[error("Severity threshold {0} given more than once")]
    DuplicateThreshold(Threshold),
    #[error("Start time {start} is not before end time {end}")]
    InvalidTimeRange { start: Time, end: Time },
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error(
        "Segment starting at {next_start} overlaps the previous segment ending at {previous_end}"
    )]
    Overlap { previous_end: Time, next_start: Time },
    #[error("Spanning {span}s at a stride of {stride}s needs more samples than can be allocated")]
    TooManyBins { span: Time, stride: Time },
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot serialise {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum GlitchRateError {
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),
    #[error("Input Error: {0}")]
    Loader(#[from] LoaderError),
    #[error("Series Error: {0}")]
    Series(#[from] SeriesError),
    #[error("Output Error: {0}")]
    Output(#[from] OutputError),
}
