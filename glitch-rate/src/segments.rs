use crate::averaging::AveragingConfig;
use glitch_rate_common::Segment;

/// Keeps, in order, the segments long enough to produce at least one averaged point.
pub fn filter_segments(segments: &[Segment], config: &AveragingConfig) -> Vec<Segment> {
    let min_span = config.min_span();
    segments
        .iter()
        .filter(|segment| segment.span() >= min_span)
        .copied()
        .collect()
}

/// Restricts `segments` to `window`, dropping those lying wholly outside it.
pub fn clip_segments(segments: &[Segment], window: &Segment) -> Vec<Segment> {
    segments
        .iter()
        .filter_map(|segment| segment.intersection(window))
        .collect()
}
