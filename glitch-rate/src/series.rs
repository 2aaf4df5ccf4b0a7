use crate::{averaging::rate::checked_count, error::SeriesError};
use glitch_rate_common::{Real, Segment, Time};
use serde::Serialize;

/// Segment boundaries closer than this are treated as touching.
const TIME_TOLERANCE: Time = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(into = "(Time, Real)")]
pub struct Sample {
    pub time: Time,
    pub value: Real,
}

impl Sample {
    pub fn new(time: Time, value: Real) -> Self {
        Self { time, value }
    }
}

impl From<Sample> for (Time, Real) {
    fn from(sample: Sample) -> Self {
        (sample.time, sample.value)
    }
}

/// The moving average of one validity segment.
#[derive(Clone, Debug, PartialEq)]
pub struct AveragedSeries {
    segment: Segment,
    samples: Vec<Sample>,
}

impl AveragedSeries {
    pub fn new(segment: Segment, samples: Vec<Sample>) -> Self {
        Self { segment, samples }
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn values(&self) -> impl Iterator<Item = Real> + '_ {
        self.samples.iter().map(|sample| sample.value)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Moving averages of successive segments joined into one series, with
/// pad samples standing in for the time between segments.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ContinuousSeries {
    stride: Time,
    samples: Vec<Sample>,
    #[serde(skip)]
    covered_until: Option<Time>,
    #[serde(skip)]
    pad_count: usize,
}

impl ContinuousSeries {
    pub fn new(stride: Time) -> Self {
        Self {
            stride,
            ..Default::default()
        }
    }

    /// Appends `next`, first filling any gap between the end of the previously
    /// appended segment and the start of `next`'s segment with samples of value `pad`.
    ///
    /// A gap receives `ceil(gap / stride)` pads. They are laid back from `next`'s
    /// first sample at stride spacing, so the cadence runs unbroken from the pads
    /// into `next`. When the gap is not a whole number of strides, the step from
    /// the previous segment's last sample to the first pad is the short one.
    /// Contiguous segments receive no pads and the first segment appended is never
    /// preceded by any. A series with no samples is ignored.
    /// # Return
    /// The number of pad samples inserted.
    /// # Error Modes
    /// - Emits `Err(SeriesError::Overlap)` if `next` starts before the previous segment ended.
    /// - Emits `Err(SeriesError::TooManyBins)` if the gap needs more pads than can be allocated.
    pub fn append_with_pad(
        &mut self,
        next: AveragedSeries,
        pad: Real,
    ) -> Result<usize, SeriesError> {
        let Some(first) = next.samples().first().copied() else {
            return Ok(0);
        };
        let next_start = next.segment().start();

        let num_pads = match self.covered_until {
            Some(previous_end) if next_start < previous_end - TIME_TOLERANCE => {
                return Err(SeriesError::Overlap {
                    previous_end,
                    next_start,
                });
            }
            Some(previous_end) => {
                let gap = (next_start - previous_end - TIME_TOLERANCE).max(0.0);
                checked_count((gap / self.stride).ceil(), gap, self.stride)?
            }
            None => 0,
        };

        let stride = self.stride;
        self.samples.extend(
            (1..=num_pads)
                .rev()
                .map(|k| Sample::new(first.time - k as Time * stride, pad)),
        );
        self.covered_until = Some(next.segment().end());
        self.samples.extend(next.samples);
        self.pad_count += num_pads;
        Ok(num_pads)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of pad samples inserted so far.
    pub fn pad_count(&self) -> usize {
        self.pad_count
    }

    pub fn values(&self) -> impl Iterator<Item = Real> + '_ {
        self.samples.iter().map(|sample| sample.value)
    }

    pub fn times(&self) -> impl Iterator<Item = Time> + '_ {
        self.samples.iter().map(|sample| sample.time)
    }
}
