//! Converts the triggers found inside one validity segment into a smoothed
//! rate series. Typical usage looks like:
//! ```ignore
//! let config = AveragingConfig::new(60.0, 30)?;
//! let averaged = moving_average(&events, &config, &segment)?;
//! ```
//! where the events are already restricted to `segment` and to the severity
//! threshold being evaluated.
pub(crate) mod moving_average;
pub(crate) mod rate;

use crate::{
    error::{ConfigError, SeriesError},
    series::{AveragedSeries, Sample},
};
use glitch_rate_common::{Event, Segment, Time};
use itertools::Itertools;
use serde::Serialize;
use tracing::instrument;

pub(crate) use moving_average::MovingAverage;
pub(crate) use rate::RateSeries;

/// Bin width and window length, fixed for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AveragingConfig {
    stride: Time,
    averaging_length: usize,
}

impl AveragingConfig {
    pub fn new(stride: Time, averaging_length: usize) -> Result<Self, ConfigError> {
        if !stride.is_finite() || stride <= 0.0 {
            return Err(ConfigError::InvalidStride(stride));
        }
        if averaging_length == 0 {
            return Err(ConfigError::ZeroAveragingLength);
        }
        Ok(Self {
            stride,
            averaging_length,
        })
    }

    pub fn stride(&self) -> Time {
        self.stride
    }

    pub fn averaging_length(&self) -> usize {
        self.averaging_length
    }

    /// The shortest segment which can produce one averaged point.
    pub fn min_span(&self) -> Time {
        self.stride * self.averaging_length as Time
    }

    /// Offset from the start of a window to the bin whose time labels it.
    /// For even lengths this is the left of the two central bins.
    pub fn centre_offset(&self) -> Time {
        (self.averaging_length / 2) as Time * self.stride
    }

    /// Extra time requested either side of the analysis range so that points
    /// near its edges are averaged over full windows.
    pub fn cushion(&self) -> Time {
        self.min_span() / 2.0
    }
}

pub(crate) trait Window: Clone {
    type InputType: Copy;
    type OutputType;

    fn push(&mut self, value: Self::InputType) -> bool;
    fn output(&self) -> Option<Self::OutputType>;
}

#[derive(Clone)]
pub(crate) struct WindowIter<I, W>
where
    I: Iterator,
    W: Window,
{
    window_function: W,
    source: I,
}

impl<I, W> WindowIter<I, W>
where
    I: Iterator,
    W: Window,
{
    pub(crate) fn new(source: I, window_function: W) -> Self {
        WindowIter {
            source,
            window_function,
        }
    }
}

impl<I, W> Iterator for WindowIter<I, W>
where
    I: Iterator<Item = W::InputType>,
    W: Window,
{
    type Item = W::OutputType;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let val = self.source.next()?;
            if self.window_function.push(val) {
                return self.window_function.output();
            }
        }
    }
}

pub(crate) trait WindowFilter<I, W>
where
    I: Iterator,
    W: Window,
{
    fn window(self, window: W) -> WindowIter<I, W>;
}

impl<I, W> WindowFilter<I, W> for I
where
    I: Iterator,
    W: Window,
{
    fn window(self, window: W) -> WindowIter<I, W> {
        WindowIter::<I, W>::new(self, window)
    }
}

/// Times labelling each window position over a segment of `bin_count` bins.
///
/// These are derived from the segment alone, independently of the averaged
/// values they are later zipped with.
pub(crate) fn window_times(
    segment: &Segment,
    config: &AveragingConfig,
    bin_count: usize,
) -> impl Iterator<Item = Time> + use<> {
    let num_windows = (bin_count + 1).saturating_sub(config.averaging_length());
    let first = segment.start() + config.centre_offset();
    let stride = config.stride();
    (0..num_windows).map(move |i| first + i as Time * stride)
}

/// Bins `events` over `segment` and applies a simple moving average of
/// `config.averaging_length()` bins.
///
/// A segment with fewer bins than the averaging length yields an empty series.
/// # Error Modes
/// - Emits `Err(SeriesError::TooManyBins)` if the stride divides `segment` into
///   more bins than can be allocated.
#[instrument(skip_all, level = "debug", fields(
    segment_start = segment.start(),
    segment_end = segment.end(),
    num_events = events.len(),
))]
pub fn moving_average(
    events: &[Event],
    config: &AveragingConfig,
    segment: &Segment,
) -> Result<AveragedSeries, SeriesError> {
    let rates = RateSeries::from_events(events, segment, config.stride())?;

    let values = rates
        .rates()
        .iter()
        .copied()
        .window(MovingAverage::new(config.averaging_length()));

    // zip_eq panics if the two disagree in length, which would be a defect.
    let samples = window_times(segment, config, rates.len())
        .zip_eq(values)
        .map(|(time, value)| Sample::new(time, value))
        .collect();

    Ok(AveragedSeries::new(*segment, samples))
}
