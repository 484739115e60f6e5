use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Variable holding the log filter, e.g. `TIL_LOG=til=debug`.
pub const LOG_ENV: &str = "TIL_LOG";

/// Sends `tracing` output to stderr so stdout stays clean for rendered pages.
/// Defaults to `warn` when `TIL_LOG` is unset or invalid.
pub fn init() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
