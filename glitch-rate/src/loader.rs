//! Reads the trigger list and validity segments a run works from.
//!
//! Events are a JSON array of `{"time": .., "snr": ..}` objects (`peak` is
//! accepted in place of `time`), segments a JSON array of `[start, end]` pairs.
use crate::error::LoaderError;
use glitch_rate_common::{Event, Segment};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path};
use tracing::{info, instrument};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoaderError> {
    let file = File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoaderError::Json {
        path: path.to_owned(),
        source,
    })
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_events(path: &Path) -> Result<Vec<Event>, LoaderError> {
    let events: Vec<Event> = read_json(path)?;
    info!("Loaded {} events", events.len());
    Ok(events)
}

/// # Error Modes
/// - Emits `LoaderError::Json` if any segment does not end after it starts.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_segments(path: &Path) -> Result<Vec<Segment>, LoaderError> {
    let segments: Vec<Segment> = read_json(path)?;
    info!("Loaded {} segments", segments.len());
    Ok(segments)
}

/// Keeps the events falling inside any of `segments`.
pub fn select_events(events: Vec<Event>, segments: &[Segment]) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| segments.iter().any(|segment| segment.contains(event.time)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn events_with_either_time_field() {
        let file = write_temp(
            r#"[{"time": 1000.5, "snr": 6.2}, {"peak": 1010.0, "snr": 11.0}]"#,
        );
        let events = load_events(file.path()).unwrap();
        assert_eq!(
            events,
            vec![Event::new(1000.5, 6.2), Event::new(1010.0, 11.0)]
        );
    }

    #[test]
    fn segments_as_pairs() {
        let file = write_temp("[[0, 100], [200.5, 300]]");
        let segments = load_segments(file.path()).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::new(0.0, 100.0).unwrap(),
                Segment::new(200.5, 300.0).unwrap()
            ]
        );
    }

    #[test]
    fn reversed_segment_is_rejected() {
        let file = write_temp("[[0, 100], [300, 200]]");
        assert!(matches!(
            load_segments(file.path()),
            Err(LoaderError::Json { .. })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_events(Path::new("/nonexistent/events.json")),
            Err(LoaderError::Io { .. })
        ));
    }

    #[test]
    fn events_outside_segments_are_dropped() {
        let segments = [
            Segment::new(0.0, 100.0).unwrap(),
            Segment::new(200.0, 300.0).unwrap(),
        ];
        let events = vec![
            Event::new(50.0, 5.0),
            Event::new(100.0, 5.0),
            Event::new(150.0, 5.0),
            Event::new(200.0, 5.0),
        ];
        assert_eq!(
            select_events(events, &segments),
            vec![Event::new(50.0, 5.0), Event::new(200.0, 5.0)]
        );
    }
}
