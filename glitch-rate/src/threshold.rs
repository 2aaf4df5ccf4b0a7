use crate::{
    error::{ConfigError, SeriesError},
    series::{AveragedSeries, ContinuousSeries},
};
use glitch_rate_common::{Event, Real, Snr, Time};
use ndarray::ArrayView1;
use serde::Serialize;
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    num::ParseFloatError,
    ops::Deref,
    str::FromStr,
};
use thiserror::Error;

/// Value of the samples bridging the time between segments.
pub const PAD_VALUE: Real = 0.0;

#[derive(Debug, Error)]
pub enum ParseThresholdError {
    #[error("Invalid threshold: {0}")]
    Float(#[from] ParseFloatError),
    #[error("Threshold must be finite, got {0}")]
    NotFinite(Snr),
}

/// Minimum SNR for an event to be counted. Totally ordered so it can key a map.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(transparent)]
pub struct Threshold(Snr);

impl Threshold {
    pub fn new(value: Snr) -> Result<Self, ParseThresholdError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(ParseThresholdError::NotFinite(value))
        }
    }

    pub fn value(&self) -> Snr {
        self.0
    }

    pub fn admits(&self, event: &Event) -> bool {
        event.snr >= self.0
    }
}

impl PartialEq for Threshold {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Threshold {}

impl PartialOrd for Threshold {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Threshold {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Display for Threshold {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Threshold {
    type Err = ParseThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Threshold::new(s.trim().parse()?)
    }
}

/// A non-empty list of distinct thresholds, in the order given.
#[derive(Clone, Debug, PartialEq)]
pub struct Thresholds(Vec<Threshold>);

impl Thresholds {
    pub fn new(thresholds: Vec<Threshold>) -> Result<Self, ConfigError> {
        if thresholds.is_empty() {
            return Err(ConfigError::NoThresholds);
        }
        for (index, threshold) in thresholds.iter().enumerate() {
            if thresholds.iter().take(index).any(|other| other == threshold) {
                return Err(ConfigError::DuplicateThreshold(*threshold));
            }
        }
        Ok(Self(thresholds))
    }

    pub fn as_slice(&self) -> &[Threshold] {
        &self.0
    }
}

impl Deref for Thresholds {
    type Target = [Threshold];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Summary of every averaged value produced for one threshold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RateStatistics {
    Available {
        mean: Real,
        /// Population standard deviation.
        std_dev: Real,
        count: usize,
    },
    NoData,
}

impl RateStatistics {
    pub fn from_values(values: &[Real]) -> Self {
        let values = ArrayView1::from(values);
        match values.mean() {
            Some(mean) => Self::Available {
                mean,
                std_dev: values.std(0.0),
                count: values.len(),
            },
            None => Self::NoData,
        }
    }

    pub fn mean(&self) -> Option<Real> {
        match self {
            Self::Available { mean, .. } => Some(*mean),
            Self::NoData => None,
        }
    }

    pub fn std_dev(&self) -> Option<Real> {
        match self {
            Self::Available { std_dev, .. } => Some(*std_dev),
            Self::NoData => None,
        }
    }

    /// `(mean - std_dev, mean + std_dev)`.
    pub fn band(&self) -> Option<(Real, Real)> {
        match self {
            Self::Available { mean, std_dev, .. } => Some((mean - std_dev, mean + std_dev)),
            Self::NoData => None,
        }
    }
}

/// Per-threshold state owned by the loop processing that threshold.
#[derive(Debug)]
pub struct ThresholdAccumulator {
    threshold: Threshold,
    series: ContinuousSeries,
    values: Vec<Real>,
}

impl ThresholdAccumulator {
    pub fn new(threshold: Threshold, stride: Time) -> Self {
        Self {
            threshold,
            series: ContinuousSeries::new(stride),
            values: Vec::new(),
        }
    }

    /// Adds one segment's moving average. Returns the number of pad samples inserted.
    pub fn push(&mut self, averaged: AveragedSeries) -> Result<usize, SeriesError> {
        let values: Vec<Real> = averaged.values().collect();
        let pads = self.series.append_with_pad(averaged, PAD_VALUE)?;
        self.values.extend(values);
        Ok(pads)
    }

    pub fn finish(self) -> ThresholdResult {
        ThresholdResult {
            threshold: self.threshold,
            statistics: RateStatistics::from_values(&self.values),
            series: self.series,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdResult {
    pub threshold: Threshold,
    pub series: ContinuousSeries,
    pub statistics: RateStatistics,
}

impl ThresholdResult {
    pub fn name(&self) -> String {
        format!("MA_{}", self.threshold)
    }

    pub fn has_data(&self) -> bool {
        !matches!(self.statistics, RateStatistics::NoData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Sample;
    use assert_approx_eq::assert_approx_eq;
    use glitch_rate_common::Segment;

    fn threshold(value: Snr) -> Threshold {
        Threshold::new(value).unwrap()
    }

    #[test]
    fn statistics_of_known_values() {
        let statistics =
            RateStatistics::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_approx_eq!(statistics.mean().unwrap(), 5.0);
        assert_approx_eq!(statistics.std_dev().unwrap(), 2.0);
        let (lower, upper) = statistics.band().unwrap();
        assert_approx_eq!(lower, 3.0);
        assert_approx_eq!(upper, 7.0);
    }

    #[test]
    fn statistics_of_nothing() {
        let statistics = RateStatistics::from_values(&[]);
        assert_eq!(statistics, RateStatistics::NoData);
        assert_eq!(statistics.mean(), None);
        assert_eq!(statistics.band(), None);
    }

    #[test]
    fn no_data_serialises_distinctly() {
        let json = serde_json::to_string(&RateStatistics::NoData).unwrap();
        assert_eq!(json, r#"{"status":"no_data"}"#);
    }

    #[test]
    fn parse_threshold() {
        assert_eq!(" 8 ".parse::<Threshold>().unwrap(), threshold(8.0));
        assert!("eight".parse::<Threshold>().is_err());
        assert!("inf".parse::<Threshold>().is_err());
        assert!("NaN".parse::<Threshold>().is_err());
    }

    #[test]
    fn threshold_display_and_name() {
        assert_eq!(threshold(5.0).to_string(), "5");
        assert_eq!(threshold(7.5).to_string(), "7.5");

        let result = ThresholdAccumulator::new(threshold(10.0), 60.0).finish();
        assert_eq!(result.name(), "MA_10");
        assert!(!result.has_data());
    }

    #[test]
    fn threshold_admits_events_at_or_above() {
        let threshold = threshold(8.0);
        assert!(threshold.admits(&Event::new(0.0, 8.0)));
        assert!(threshold.admits(&Event::new(0.0, 20.0)));
        assert!(!threshold.admits(&Event::new(0.0, 7.99)));
    }

    #[test]
    fn thresholds_must_be_distinct_and_present() {
        assert_eq!(Thresholds::new(vec![]), Err(ConfigError::NoThresholds));
        assert_eq!(
            Thresholds::new(vec![threshold(5.0), threshold(8.0), threshold(5.0)]),
            Err(ConfigError::DuplicateThreshold(threshold(5.0)))
        );
        let thresholds = Thresholds::new(vec![threshold(8.0), threshold(5.0)]).unwrap();
        assert_eq!(thresholds.as_slice(), &[threshold(8.0), threshold(5.0)]);
    }

    #[test]
    fn accumulator_collects_values_across_segments() {
        let mut accumulator = ThresholdAccumulator::new(threshold(5.0), 60.0);
        let first = AveragedSeries::new(
            Segment::new(0.0, 180.0).unwrap(),
            vec![Sample::new(60.0, 1.0), Sample::new(120.0, 3.0)],
        );
        let second = AveragedSeries::new(
            Segment::new(300.0, 420.0).unwrap(),
            vec![Sample::new(360.0, 2.0)],
        );

        assert_eq!(accumulator.push(first).unwrap(), 0);
        assert_eq!(accumulator.push(second).unwrap(), 2);

        let result = accumulator.finish();
        assert_eq!(result.series.len(), 5);
        assert!(matches!(
            result.statistics,
            RateStatistics::Available { count: 3, .. }
        ));
        assert_approx_eq!(result.statistics.mean().unwrap(), 2.0);
        assert_approx_eq!(
            result.statistics.std_dev().unwrap(),
            (2.0 as Real / 3.0).sqrt()
        );
    }
}
