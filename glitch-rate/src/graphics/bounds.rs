use crate::threshold::{Threshold, ThresholdResult};
use itertools::{Itertools, MinMaxResult};
use std::collections::BTreeMap;

#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub(crate) struct Pair<D: Default> {
    pub(crate) time: D,
    pub(crate) rate: D,
}

#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bound {
    pub(crate) min: f64,
    pub(crate) max: f64,
}

impl Bound {
    pub(crate) fn from<I: Iterator<Item = f64>>(data: I) -> Option<Bound> {
        match data.minmax_by(f64::total_cmp) {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(value) => Some(Bound {
                min: value,
                max: value,
            }),
            MinMaxResult::MinMax(min, max) => Some(Bound { min, max }),
        }
    }

    pub(crate) fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Pads both ends by `fraction` of the range, or by one unit if the range is empty.
    fn widen(self, fraction: f64) -> Self {
        let margin = if self.range() > 0.0 {
            self.range() * fraction
        } else {
            1.0
        };
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }
}

pub(crate) type Bounds = Pair<Bound>;

impl Bounds {
    /// Covers every sample of every series and, where statistics exist,
    /// the mean ± standard deviation levels. The rate axis always includes zero.
    pub(crate) fn from_results(results: &BTreeMap<Threshold, ThresholdResult>) -> Self {
        let time = Bound::from(results.values().flat_map(|result| result.series.times()))
            .unwrap_or_default()
            .widen(0.01);

        let levels = results
            .values()
            .filter_map(|result| result.statistics.band())
            .flat_map(|(lower, upper)| [lower, upper]);
        let rate = Bound::from(
            results
                .values()
                .flat_map(|result| result.series.values())
                .chain(levels)
                .chain(std::iter::once(0.0)),
        )
        .unwrap_or_default()
        .widen(0.05);

        Bounds { time, rate }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        series::{AveragedSeries, Sample},
        threshold::ThresholdAccumulator,
    };
    use assert_approx_eq::assert_approx_eq;
    use glitch_rate_common::Segment;

    #[test]
    fn bound_of_values() {
        assert_eq!(Bound::from(std::iter::empty()), None);
        assert_eq!(
            Bound::from([3.0].into_iter()),
            Some(Bound { min: 3.0, max: 3.0 })
        );
        assert_eq!(
            Bound::from([3.0, -1.0, 7.0].into_iter()),
            Some(Bound {
                min: -1.0,
                max: 7.0
            })
        );
    }

    #[test]
    fn bounds_cover_series_and_levels() {
        let threshold = Threshold::new(5.0).unwrap();
        let mut accumulator = ThresholdAccumulator::new(threshold, 60.0);
        accumulator
            .push(AveragedSeries::new(
                Segment::new(0.0, 1200.0).unwrap(),
                vec![Sample::new(100.0, 2.0), Sample::new(1100.0, 4.0)],
            ))
            .unwrap();
        let results = BTreeMap::from([(threshold, accumulator.finish())]);

        let bounds = Bounds::from_results(&results);
        assert_approx_eq!(bounds.time.min, 90.0);
        assert_approx_eq!(bounds.time.max, 1110.0);
        assert_approx_eq!(bounds.rate.min, -0.2);
        assert_approx_eq!(bounds.rate.max, 4.2);
    }

    #[test]
    fn empty_results_give_usable_bounds() {
        let bounds = Bounds::from_results(&BTreeMap::new());
        assert!(bounds.time.range() > 0.0);
        assert!(bounds.rate.range() > 0.0);
    }
}
