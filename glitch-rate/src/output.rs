use crate::{
    averaging::AveragingConfig,
    error::OutputError,
    series::Sample,
    threshold::{RateStatistics, Threshold, ThresholdResult},
};
use glitch_rate_common::Time;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs::{File, create_dir_all},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

/// Series written for one threshold.
#[derive(Serialize)]
struct SeriesRecord<'a> {
    name: String,
    channel: &'a str,
    threshold: Threshold,
    stride: Time,
    averaging_length: usize,
    samples: &'a [Sample],
}

#[derive(Serialize)]
struct StatisticsRecord {
    name: String,
    threshold: Threshold,
    #[serde(flatten)]
    statistics: RateStatistics,
}

/// The folder for a run's output, named after the averaging span in whole minutes.
pub fn output_folder(output_dir: &Path, config: &AveragingConfig) -> PathBuf {
    output_dir.join(format!("m{}avg", (config.min_span() / 60.0).floor() as u64))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), OutputError> {
    let io_error = |source| OutputError::Io {
        path: path.to_owned(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| OutputError::Json {
        path: path.to_owned(),
        source,
    })?;
    writer.flush().map_err(io_error)
}

/// Writes `MA_<threshold>.json` for each threshold and a `statistics.json` summary.
/// # Return
/// The paths written, series files first.
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn write_results(
    folder: &Path,
    channel: &str,
    config: &AveragingConfig,
    results: &BTreeMap<Threshold, ThresholdResult>,
) -> Result<Vec<PathBuf>, OutputError> {
    create_dir_all(folder).map_err(|source| OutputError::Io {
        path: folder.to_owned(),
        source,
    })?;

    let mut written = Vec::with_capacity(results.len() + 1);
    for result in results.values() {
        let name = result.name();
        let path = folder.join(format!("{name}.json"));
        write_json(
            &path,
            &SeriesRecord {
                name,
                channel,
                threshold: result.threshold,
                stride: config.stride(),
                averaging_length: config.averaging_length(),
                samples: result.series.samples(),
            },
        )?;
        written.push(path);
    }

    let statistics: Vec<_> = results
        .values()
        .map(|result| StatisticsRecord {
            name: result.name(),
            threshold: result.threshold,
            statistics: result.statistics,
        })
        .collect();
    let path = folder.join("statistics.json");
    write_json(&path, &statistics)?;
    written.push(path);

    info!("Wrote {} files", written.len());
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::{
        series::AveragedSeries,
        threshold::ThresholdAccumulator,
    };
    use glitch_rate_common::Segment;
    use serde_json::{Value, json};

    fn results() -> BTreeMap<Threshold, ThresholdResult> {
        let five = Threshold::new(5.0).unwrap();
        let mut accumulator = ThresholdAccumulator::new(five, 60.0);
        accumulator
            .push(AveragedSeries::new(
                Segment::new(0.0, 180.0).unwrap(),
                vec![Sample::new(60.0, 1.0), Sample::new(120.0, 3.0)],
            ))
            .unwrap();

        let twenty = Threshold::new(20.0).unwrap();
        BTreeMap::from([
            (five, accumulator.finish()),
            (twenty, ThresholdAccumulator::new(twenty, 60.0).finish()),
        ])
    }

    fn read(path: &Path) -> Value {
        serde_json::from_reader(File::open(path).unwrap()).unwrap()
    }

    #[test]
    fn folder_is_named_after_span_in_minutes() {
        let config = AveragingConfig::new(60.0, 30).unwrap();
        assert_eq!(
            output_folder(Path::new("/out"), &config),
            PathBuf::from("/out/m30avg")
        );
        let config = AveragingConfig::new(45.0, 25).unwrap();
        assert_eq!(
            output_folder(Path::new("/out"), &config),
            PathBuf::from("/out/m18avg")
        );
    }

    #[test]
    fn series_and_statistics_files() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("m2avg");
        let config = AveragingConfig::new(60.0, 2).unwrap();

        let written = write_results(&folder, "L1:GDS-CALIB_STRAIN", &config, &results()).unwrap();
        assert_eq!(
            written,
            vec![
                folder.join("MA_5.json"),
                folder.join("MA_20.json"),
                folder.join("statistics.json")
            ]
        );

        let series = read(&folder.join("MA_5.json"));
        assert_eq!(series["name"], json!("MA_5"));
        assert_eq!(series["channel"], json!("L1:GDS-CALIB_STRAIN"));
        assert_eq!(series["samples"], json!([[60.0, 1.0], [120.0, 3.0]]));

        let empty = read(&folder.join("MA_20.json"));
        assert_eq!(empty["samples"], json!([]));

        let statistics = read(&folder.join("statistics.json"));
        assert_eq!(statistics[0]["status"], json!("available"));
        assert_eq!(statistics[0]["mean"], json!(2.0));
        assert_eq!(statistics[0]["count"], json!(2));
        assert_eq!(statistics[1]["name"], json!("MA_20"));
        assert_eq!(statistics[1]["status"], json!("no_data"));
        assert!(statistics[1].get("mean").is_none());
    }
}
