pub mod metrics;
pub mod tracer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// GPS seconds.
pub type Time = f64;
pub type Real = f64;
/// Signal to noise ratio of a trigger, used as its severity.
pub type Snr = f64;

/// A single trigger produced by the event finder. Only the peak time and
/// the signal to noise ratio are used downstream.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(alias = "peak")]
    pub time: Time,
    pub snr: Snr,
}

impl Event {
    pub fn new(time: Time, snr: Snr) -> Self {
        Self { time, snr }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SegmentError {
    #[error("Segment end {end} is not after its start {start}")]
    NotIncreasing { start: Time, end: Time },
    #[error("Segment boundary is not finite: [{start}, {end})")]
    NotFinite { start: Time, end: Time },
}

/// Half-open validity interval `[start, end)`.
///
/// Serialised as a two element array, the layout used by segment lists.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(Time, Time)", into = "(Time, Time)")]
pub struct Segment {
    start: Time,
    end: Time,
}

impl Segment {
    pub fn new(start: Time, end: Time) -> Result<Self, SegmentError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SegmentError::NotFinite { start, end });
        }
        if end <= start {
            return Err(SegmentError::NotIncreasing { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Time {
        self.start
    }

    pub fn end(&self) -> Time {
        self.end
    }

    pub fn span(&self) -> Time {
        self.end - self.start
    }

    pub fn contains(&self, time: Time) -> bool {
        self.start <= time && time < self.end
    }

    /// Returns the part of `self` lying inside `other`, if any.
    pub fn intersection(&self, other: &Segment) -> Option<Segment> {
        Segment::new(self.start.max(other.start), self.end.min(other.end)).ok()
    }
}

impl TryFrom<(Time, Time)> for Segment {
    type Error = SegmentError;

    fn try_from((start, end): (Time, Time)) -> Result<Self, Self::Error> {
        Segment::new(start, end)
    }
}

impl From<Segment> for (Time, Time) {
    fn from(segment: Segment) -> Self {
        (segment.start, segment.end)
    }
}
