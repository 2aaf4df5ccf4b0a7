use crate::{
    averaging::{AveragingConfig, moving_average},
    error::SeriesError,
    segments::filter_segments,
    threshold::{Threshold, ThresholdAccumulator, ThresholdResult, Thresholds},
};
use glitch_rate_common::{
    Event, Segment,
    metrics::{
        names::{AVERAGED_POINTS, PAD_SAMPLES, SEGMENTS},
        segments::{self, SegmentDisposition},
        thresholds,
    },
};
use metrics::counter;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// The events lying in `segment`, given events sorted by time.
fn events_in<'a>(events: &'a [Event], segment: &Segment) -> &'a [Event] {
    let lower = events.partition_point(|event| event.time < segment.start());
    let upper = events.partition_point(|event| event.time < segment.end());
    events.get(lower..upper).unwrap_or_default()
}

#[instrument(skip_all, level = "debug", fields(threshold = %threshold))]
fn process_threshold(
    events: &[Event],
    segments: &[Segment],
    config: &AveragingConfig,
    threshold: Threshold,
) -> Result<ThresholdResult, SeriesError> {
    let admitted: Vec<Event> = events
        .iter()
        .filter(|event| threshold.admits(event))
        .copied()
        .collect();

    let mut accumulator = ThresholdAccumulator::new(threshold, config.stride());
    for segment in segments {
        let averaged = moving_average(events_in(&admitted, segment), config, segment)?;
        debug!(
            "Segment [{}, {}): {} averaged points",
            segment.start(),
            segment.end(),
            averaged.len()
        );
        accumulator.push(averaged)?;
    }
    let result = accumulator.finish();

    let averaged_points = result.series.len() - result.series.pad_count();
    counter!(AVERAGED_POINTS, &[thresholds::get_label(threshold)])
        .increment(averaged_points as u64);
    counter!(PAD_SAMPLES, &[thresholds::get_label(threshold)])
        .increment(result.series.pad_count() as u64);

    Ok(result)
}

/// Computes the gap-padded moving average series and its statistics for each threshold.
///
/// Segments too short for one full window are dropped first. Thresholds are
/// independent and are processed in parallel.
#[instrument(skip_all, fields(
    num_events = events.len(),
    num_segments = segments.len(),
    num_thresholds = thresholds.len(),
))]
pub fn process(
    events: &[Event],
    segments: &[Segment],
    config: &AveragingConfig,
    thresholds: &Thresholds,
) -> Result<BTreeMap<Threshold, ThresholdResult>, SeriesError> {
    let retained = filter_segments(segments, config);
    let discarded = segments.len() - retained.len();
    info!(
        "Retained {} of {} segments at least {}s long",
        retained.len(),
        segments.len(),
        config.min_span()
    );
    counter!(SEGMENTS, &[segments::get_label(SegmentDisposition::Retained)])
        .increment(retained.len() as u64);
    counter!(SEGMENTS, &[segments::get_label(SegmentDisposition::Discarded)])
        .increment(discarded as u64);

    let mut sorted = events.to_vec();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));

    thresholds
        .as_slice()
        .par_iter()
        .map(|&threshold| {
            process_threshold(&sorted, &retained, config, threshold)
                .map(|result| (threshold, result))
        })
        .collect()
}
