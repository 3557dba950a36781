//! Structured logging for the LithoLicht preview.
//!
//! Console output with uptime timestamps and module paths via the `tracing`
//! ecosystem, plus JSON file logging in debug builds for post-mortem
//! analysis. The configured log level can be overridden with `RUST_LOG`.

use std::path::Path;

use litho_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber for the preview.
///
/// # Arguments
///
/// * `log_dir` - Optional directory for JSON log files (debug builds only)
/// * `debug_build` - Whether this is a debug build (enables file logging)
/// * `config` - Optional configuration to use for log level override
///
/// # Examples
///
/// ```no_run
/// use litho_config::Config;
/// use litho_log::init_logging;
///
/// // Basic initialization
/// init_logging(None, false, None);
///
/// // With file logging in debug mode
/// let log_dir = std::path::Path::new("./logs");
/// init_logging(Some(log_dir), true, None);
///
/// // With config override
/// let config = Config::default();
/// init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => "info,wgpu=warn,naga=warn".to_string(),
    };

    // RUST_LOG wins over the configured level
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true) // decode worker is named
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    // In debug builds, also log to a file for post-mortem analysis
    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("litho.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Create an `EnvFilter` with the default filter string.
///
/// Enables `info` for all targets and quiets `wgpu`/`naga` down to `warn`;
/// the GPU stack is chatty at `info` during surface reconfiguration.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info,wgpu=warn,naga=warn")
}
