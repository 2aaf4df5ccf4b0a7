use metrics::{describe_gauge, gauge};

pub fn component_info_metric(name: &'static str) {
    static NAME: &str = "glitch_rate_component_info";

    describe_gauge!(NAME, "Basic information about the component");

    let git_rev = option_env!("GIT_VERSION").unwrap_or("unknown");
    gauge!(NAME, "component" => name, "git_version" => git_rev).set(1);
}

pub mod names {
    use const_format::concatcp;

    pub const METRIC_NAME_PREFIX: &str = "glitch_rate_";

    pub const FAILURES: &str = concatcp!(METRIC_NAME_PREFIX, "failures");
    pub const SEGMENTS: &str = concatcp!(METRIC_NAME_PREFIX, "segments");
    pub const EVENTS_LOADED: &str = concatcp!(METRIC_NAME_PREFIX, "events_loaded");
    pub const AVERAGED_POINTS: &str = concatcp!(METRIC_NAME_PREFIX, "averaged_points");
    pub const PAD_SAMPLES: &str = concatcp!(METRIC_NAME_PREFIX, "pad_samples");
}

pub mod segments {
    #[derive(Debug, Clone, Eq, Hash, PartialEq)]
    pub enum SegmentDisposition {
        Retained,
        Discarded,
    }

    // Label building function
    pub fn get_label(disposition: SegmentDisposition) -> (&'static str, &'static str) {
        (
            "segment_disposition",
            match disposition {
                SegmentDisposition::Retained => "retained",
                SegmentDisposition::Discarded => "discarded",
            },
        )
    }
}

pub mod thresholds {
    // Label building function
    pub fn get_label(threshold: impl ToString) -> (&'static str, String) {
        ("threshold", threshold.to_string())
    }
}

pub mod failures {
    #[derive(Debug, Clone, Eq, Hash, PartialEq)]
    pub enum FailureKind {
        InputLoadFailed,
        DataProcessingFailed,
        FileWriteFailed,
        PlotFailed,
    }

    // Label building function
    pub fn get_label(failure_kind: FailureKind) -> (&'static str, &'static str) {
        (
            "failure_kind",
            match failure_kind {
                FailureKind::InputLoadFailed => "input_load_failed",
                FailureKind::DataProcessingFailed => "data_processing_failed",
                FailureKind::FileWriteFailed => "file_write_failed",
                FailureKind::PlotFailed => "plot_failed",
            },
        )
    }
}
