use crate::{
    averaging::AveragingConfig,
    error::ConfigError,
    gps::GpsTime,
    threshold::{Threshold, Thresholds},
};
use clap::Args;
use glitch_rate_common::{Segment, Time};
use std::{
    fmt::Display,
    ops::Deref,
    path::PathBuf,
    str::FromStr,
};

/// Comma separated list argument.
#[derive(Clone, Debug, PartialEq)]
pub struct CSVVec<T>(Vec<T>);

impl<T> FromStr for CSVVec<T>
where
    T: FromStr,
{
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(",")
            .map(T::from_str)
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

impl<T> Display for CSVVec<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .map(T::to_string)
                .collect::<Vec<_>>()
                .join(",")
        )
    }
}

impl<T> Deref for CSVVec<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Clone, Debug, Args)]
pub struct TimeRange {
    /// GPS start time, or UTC date and time of the start, e.g. "2019-04-01 15:00:00".
    pub gps_start: GpsTime,

    /// GPS end time, or UTC date and time of the end.
    pub gps_end: GpsTime,
}

impl TimeRange {
    /// The analysis range widened by the averaging cushion on both sides.
    pub fn query_window(&self, config: &AveragingConfig) -> Result<Segment, ConfigError> {
        let start = self.gps_start.seconds();
        let end = self.gps_end.seconds();
        let invalid = || ConfigError::InvalidTimeRange { start, end };
        if start >= end {
            return Err(invalid());
        }
        Segment::new(start - config.cushion(), end + config.cushion()).map_err(|_| invalid())
    }
}

#[derive(Clone, Debug, Args)]
pub struct AveragingParameters {
    /// Width of each event rate bin, in seconds.
    #[clap(short, long, env = "GLITCH_RATE_STRIDE", default_value = "60")]
    pub stride: Time,

    /// Number of consecutive rate bins averaged into each point.
    #[clap(short, long, env = "GLITCH_RATE_AVERAGING_LENGTH", default_value = "30")]
    pub averaging_length: usize,

    /// Comma separated SNR thresholds, a series is produced for each.
    #[clap(long, env = "GLITCH_RATE_SNR_LIST", default_value = "5,8,10,20")]
    pub snr_list: CSVVec<Threshold>,
}

impl AveragingParameters {
    pub fn averaging_config(&self) -> Result<AveragingConfig, ConfigError> {
        AveragingConfig::new(self.stride, self.averaging_length)
    }

    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        Thresholds::new(self.snr_list.to_vec())
    }
}

#[derive(Clone, Debug, Args)]
pub struct InputFiles {
    /// JSON file of triggers, each with a "time" (or "peak") and an "snr".
    #[clap(long, env = "GLITCH_RATE_EVENTS")]
    pub events: PathBuf,

    /// JSON file of validity segments, as [start, end] pairs.
    #[clap(long, env = "GLITCH_RATE_SEGMENTS")]
    pub segments: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct OutputOptions {
    /// Directory in which the series, statistics and plots are saved.
    #[clap(short, long, env = "GLITCH_RATE_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Initials of the detector, e.g. "L1" or "H1".
    #[clap(short, long, env = "GLITCH_RATE_DETECTOR", default_value = "L1")]
    pub detector: String,

    /// Skip drawing the plots.
    #[clap(long)]
    pub no_plots: bool,

    /// If set, a snapshot of the run's metrics is written here in Prometheus text format.
    #[clap(long, env = "GLITCH_RATE_METRICS_FILE")]
    pub metrics_file: Option<PathBuf>,
}

impl OutputOptions {
    pub fn channel(&self) -> String {
        format!("{}:GDS-CALIB_STRAIN", self.detector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[clap(flatten)]
        time_range: TimeRange,

        #[clap(flatten)]
        averaging: AveragingParameters,

        #[clap(flatten)]
        output: OutputOptions,
    }

    fn parse(args: &[&str]) -> Result<TestCli, clap::Error> {
        TestCli::try_parse_from(std::iter::once("glitch-rate").chain(args.iter().copied()))
    }

    fn threshold(value: f64) -> Threshold {
        Threshold::new(value).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&["1000", "2000"]).unwrap();

        let config = cli.averaging.averaging_config().unwrap();
        assert_eq!(config.stride(), 60.0);
        assert_eq!(config.averaging_length(), 30);

        let thresholds = cli.averaging.thresholds().unwrap();
        assert_eq!(
            thresholds.as_slice(),
            &[threshold(5.0), threshold(8.0), threshold(10.0), threshold(20.0)]
        );

        assert_eq!(cli.output.channel(), "L1:GDS-CALIB_STRAIN");
        assert!(!cli.output.no_plots);
    }

    #[test]
    fn explicit_values() {
        let cli = parse(&[
            "2019-04-01 15:00:00",
            "1238170000",
            "-s",
            "30",
            "-a",
            "25",
            "--snr-list",
            "6.5,12",
            "-d",
            "H1",
        ])
        .unwrap();

        assert_eq!(cli.time_range.gps_start.seconds(), 1_238_166_018.0);
        assert_eq!(cli.averaging.stride, 30.0);
        assert_eq!(cli.averaging.averaging_length, 25);
        assert_eq!(
            cli.averaging.thresholds().unwrap().as_slice(),
            &[threshold(6.5), threshold(12.0)]
        );
        assert_eq!(cli.output.channel(), "H1:GDS-CALIB_STRAIN");
    }

    #[test]
    fn unparseable_threshold_list_is_rejected() {
        assert!(parse(&["1000", "2000", "--snr-list", "5,eight"]).is_err());
    }

    #[test]
    fn invalid_values_are_rejected_before_processing() {
        let cli = parse(&["1000", "2000", "-s", "0", "--snr-list", "5,5"]).unwrap();
        assert_eq!(
            cli.averaging.averaging_config(),
            Err(ConfigError::InvalidStride(0.0))
        );
        assert_eq!(
            cli.averaging.thresholds(),
            Err(ConfigError::DuplicateThreshold(threshold(5.0)))
        );
    }

    #[test]
    fn query_window_adds_cushion() {
        let cli = parse(&["1000", "2000", "-s", "60", "-a", "25"]).unwrap();
        let config = cli.averaging.averaging_config().unwrap();
        let window = cli.time_range.query_window(&config).unwrap();
        assert_eq!(window.start(), 250.0);
        assert_eq!(window.end(), 2750.0);
    }

    #[test]
    fn reversed_time_range_is_rejected() {
        let cli = parse(&["2000", "1000"]).unwrap();
        let config = cli.averaging.averaging_config().unwrap();
        assert_eq!(
            cli.time_range.query_window(&config),
            Err(ConfigError::InvalidTimeRange {
                start: 2000.0,
                end: 1000.0
            })
        );
    }
}
