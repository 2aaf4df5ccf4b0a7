use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Initialises the stdout tracer for the component.
/// # Arguments
/// - `default_level`: the level used when `RUST_LOG` is not set.
/// # Error Modes
/// - Emits `Err` if a global subscriber has already been installed.
pub fn init_tracer(default_level: LevelFilter) -> Result<(), TryInitError> {
    let stdout_tracer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    // This filter is applied to the stdout tracer
    let log_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::Registry::default()
        .with(stdout_tracer.with_filter(log_filter))
        .try_init()
}
