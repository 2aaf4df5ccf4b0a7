//! Smoothed, gap-aware trigger rate series.
//!
//! Triggers are binned into a rate over each validity segment, smoothed with
//! a fixed length moving average, and the segments joined into one series
//! per SNR threshold with zero pads spanning the time between them.
pub mod averaging;
pub mod error;
pub mod gps;
pub mod graphics;
pub mod loader;
pub mod output;
pub mod parameters;
pub mod processing;
pub mod segments;
pub mod series;
pub mod threshold;

pub use averaging::{AveragingConfig, moving_average};
pub use error::{GlitchRateError, GlitchRateResult};
pub use processing::process;
pub use segments::filter_segments;
