use crate::error::SeriesError;
use glitch_rate_common::{Event, Real, Segment, Time};

/// Guards the bin count against rounding when a span is an exact multiple of the stride.
const BIN_TOLERANCE: Real = 1e-9;

/// Most samples a single segment, or a single gap, may be divided into.
pub(crate) const MAX_SAMPLES: usize = u32::MAX as usize;

/// Converts a whole number of strides covering `span` into a sample count.
/// # Error Modes
/// - Emits `Err(SeriesError::TooManyBins)` if `count` is not finite or exceeds [MAX_SAMPLES].
pub(crate) fn checked_count(count: Real, span: Time, stride: Time) -> Result<usize, SeriesError> {
    if count.is_finite() && count <= MAX_SAMPLES as Real {
        Ok(count.max(0.0) as usize)
    } else {
        Err(SeriesError::TooManyBins { span, stride })
    }
}

/// The number of whole bins of width `stride` fitting in `segment`.
pub(crate) fn bin_count(segment: &Segment, stride: Time) -> Result<usize, SeriesError> {
    let span = segment.span();
    checked_count((span / stride + BIN_TOLERANCE).floor(), span, stride)
}

/// Event rate in contiguous bins of width `stride` starting at the segment start.
/// Bin `i` covers `[start + i*stride, start + (i+1)*stride)`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RateSeries {
    rates: Vec<Real>,
}

impl RateSeries {
    /// Events outside the segment's whole bins are not counted.
    /// # Error Modes
    /// - Emits `Err(SeriesError::TooManyBins)` if the segment holds too many bins to allocate.
    pub(crate) fn from_events<'a, I>(
        events: I,
        segment: &Segment,
        stride: Time,
    ) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let start = segment.start();
        let mut counts = vec![0_usize; bin_count(segment, stride)?];
        for event in events {
            let index = (event.time >= start).then(|| ((event.time - start) / stride).floor());
            if let Some(count) = index.and_then(|index| counts.get_mut(index as usize)) {
                *count += 1;
            }
        }
        Ok(Self {
            rates: counts
                .into_iter()
                .map(|count| count as Real / stride)
                .collect(),
        })
    }

    pub(crate) fn rates(&self) -> &[Real] {
        &self.rates
    }

    pub(crate) fn len(&self) -> usize {
        self.rates.len()
    }
}
