use anyhow::anyhow;
use clap::Parser;
use glitch_rate::{
    GlitchRateResult,
    graphics::save_plots,
    loader::{load_events, load_segments, select_events},
    output::{output_folder, write_results},
    parameters::{AveragingParameters, InputFiles, OutputOptions, TimeRange},
    process,
    segments::clip_segments,
    threshold::{RateStatistics, Threshold, ThresholdResult},
};
use glitch_rate_common::{
    metrics::{
        component_info_metric,
        failures::{self, FailureKind},
        names::{AVERAGED_POINTS, EVENTS_LOADED, FAILURES, PAD_SAMPLES, SEGMENTS},
    },
    tracer::init_tracer,
};
use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::BTreeMap;
use tracing::{debug, info, level_filters::LevelFilter, warn};

// cargo run --bin glitch-rate -- 1238166018 1238252418 --events triggers.json --segments segments.json -o out

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(flatten)]
    time_range: TimeRange,

    #[clap(flatten)]
    inputs: InputFiles,

    #[clap(flatten)]
    averaging: AveragingParameters,

    #[clap(flatten)]
    output: OutputOptions,
}

fn record_failure(kind: FailureKind) {
    counter!(FAILURES, &[failures::get_label(kind)]).increment(1);
}

/// Validates the parameters, loads the inputs, and computes every threshold's series.
fn compute(args: &Cli) -> GlitchRateResult<BTreeMap<Threshold, ThresholdResult>> {
    let config = args.averaging.averaging_config()?;
    let thresholds = args.averaging.thresholds()?;
    let window = args.time_range.query_window(&config)?;
    info!(
        "Averaging {} bins of {}s over [{}, {}) for thresholds {}",
        config.averaging_length(),
        config.stride(),
        window.start(),
        window.end(),
        args.averaging.snr_list
    );

    let segments = load_segments(&args.inputs.segments)
        .inspect_err(|_| record_failure(FailureKind::InputLoadFailed))?;
    let segments = clip_segments(&segments, &window);

    let events = load_events(&args.inputs.events)
        .inspect_err(|_| record_failure(FailureKind::InputLoadFailed))?;
    let events = select_events(events, &segments);
    counter!(EVENTS_LOADED).increment(events.len() as u64);
    info!(
        "{} events lie within {} active segments",
        events.len(),
        segments.len()
    );

    let results = process(&events, &segments, &config, &thresholds)
        .inspect_err(|_| record_failure(FailureKind::DataProcessingFailed))?;
    Ok(results)
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    init_tracer(LevelFilter::INFO)?;
    debug!("Args: {:?}", args);

    let metrics_handle = args
        .output
        .metrics_file
        .as_ref()
        .map(|_| PrometheusBuilder::new().install_recorder())
        .transpose()?;
    component_info_metric("glitch-rate");

    // Metrics
    metrics::describe_counter!(
        SEGMENTS,
        metrics::Unit::Count,
        "Number of segments considered, by disposition"
    );
    metrics::describe_counter!(
        EVENTS_LOADED,
        metrics::Unit::Count,
        "Number of events lying within the active segments"
    );
    metrics::describe_counter!(
        AVERAGED_POINTS,
        metrics::Unit::Count,
        "Number of moving average points produced"
    );
    metrics::describe_counter!(
        PAD_SAMPLES,
        metrics::Unit::Count,
        "Number of zero samples inserted between segments"
    );
    metrics::describe_counter!(
        FAILURES,
        metrics::Unit::Count,
        "Number of failures encountered"
    );

    let results = compute(&args)?;

    for result in results.values() {
        match result.statistics {
            RateStatistics::Available {
                mean,
                std_dev,
                count,
            } => info!(
                "{}: mean {mean}, standard deviation {std_dev} over {count} points",
                result.name()
            ),
            RateStatistics::NoData => warn!(
                "{}: no averaged points, statistics are unavailable",
                result.name()
            ),
        }
    }

    let config = args.averaging.averaging_config()?;
    let folder = output_folder(&args.output.output_dir, &config);
    write_results(&folder, &args.output.channel(), &config, &results)
        .inspect_err(|_| record_failure(FailureKind::FileWriteFailed))?;

    if !args.output.no_plots {
        save_plots(&folder, &results).map_err(|e| {
            record_failure(FailureKind::PlotFailed);
            anyhow!("{e:?}")
        })?;
    }

    if let (Some(path), Some(handle)) = (&args.output.metrics_file, metrics_handle) {
        std::fs::write(path, handle.render())?;
    }
    Ok(())
}
