use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `QUILL_LOG` overrides the filter
/// (e.g. `QUILL_LOG=quill=debug`); the default stays quiet so terminal
/// output is not interleaved with log noise.
pub fn init() {
    let filter = EnvFilter::try_from_env("QUILL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("quill=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
