mod bounds;
mod svg;

use crate::threshold::{Threshold, ThresholdResult};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::instrument;

pub(crate) use bounds::Bounds;
pub(crate) use svg::SvgSaver;

const PLOT_SIZE: (u32, u32) = (2000, 700);

#[derive(Clone, Copy, Debug, Display, EnumIter, PartialEq)]
pub enum PlotKind {
    /// The series of every threshold.
    #[strum(to_string = "plot_1")]
    Series,
    /// The series of every threshold, with its mean ± standard deviation.
    #[strum(to_string = "plot_2")]
    SeriesWithStatistics,
}

impl PlotKind {
    pub fn build_path(self, folder: &Path) -> PathBuf {
        folder.join(self.to_string()).with_extension("svg")
    }

    fn caption(self) -> &'static str {
        match self {
            Self::Series => "Glitch rate moving average",
            Self::SeriesWithStatistics => "Glitch rate moving average with mean ± std",
        }
    }
}

pub(crate) trait GraphSaver: Default {
    fn save_as_svg(
        results: &BTreeMap<Threshold, ThresholdResult>,
        kind: PlotKind,
        path: &Path,
        size: (u32, u32),
        bounds: Bounds,
    ) -> miette::Result<()>;
}

/// Draws each kind of plot into `folder`, which must already exist.
/// # Return
/// The paths written.
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn save_plots(
    folder: &Path,
    results: &BTreeMap<Threshold, ThresholdResult>,
) -> miette::Result<Vec<PathBuf>> {
    let bounds = Bounds::from_results(results);
    PlotKind::iter()
        .map(|kind| {
            let path = kind.build_path(folder);
            SvgSaver::save_as_svg(results, kind, &path, PLOT_SIZE, bounds)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        series::{AveragedSeries, Sample},
        threshold::ThresholdAccumulator,
    };
    use glitch_rate_common::Segment;

    #[test]
    fn plot_paths() {
        let folder = Path::new("/out/m30avg");
        assert_eq!(
            PlotKind::Series.build_path(folder),
            PathBuf::from("/out/m30avg/plot_1.svg")
        );
        assert_eq!(
            PlotKind::SeriesWithStatistics.build_path(folder),
            PathBuf::from("/out/m30avg/plot_2.svg")
        );
    }

    #[test]
    fn plots_are_saved() {
        let five = Threshold::new(5.0).unwrap();
        let mut accumulator = ThresholdAccumulator::new(five, 60.0);
        accumulator
            .push(AveragedSeries::new(
                Segment::new(0.0, 300.0).unwrap(),
                vec![
                    Sample::new(60.0, 1.0),
                    Sample::new(120.0, 2.0),
                    Sample::new(180.0, 1.5),
                ],
            ))
            .unwrap();
        let eight = Threshold::new(8.0).unwrap();
        let results = BTreeMap::from([
            (five, accumulator.finish()),
            (eight, ThresholdAccumulator::new(eight, 60.0).finish()),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let written = save_plots(dir.path(), &results).unwrap();

        assert_eq!(written.len(), 2);
        for path in written {
            let contents = std::fs::read_to_string(&path).unwrap();
            assert!(contents.contains("<svg"));
        }
    }
}
