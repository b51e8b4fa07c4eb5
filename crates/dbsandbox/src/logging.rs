use dbsandbox_archive::Verbosity;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset.
pub fn default_level(verbosity: Verbosity) -> LevelFilter {
    match verbosity {
        Verbosity::Quiet => LevelFilter::WARN,
        Verbosity::Normal => LevelFilter::INFO,
        Verbosity::Verbose => LevelFilter::DEBUG,
    }
}

/// Install the stderr subscriber. `RUST_LOG` takes precedence over verbosity.
///
/// Calling it twice is harmless; the first subscriber stays.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbosity).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(verbosity == Verbosity::Verbose)
        .try_init();
}
