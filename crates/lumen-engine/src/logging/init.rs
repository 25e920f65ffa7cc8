use std::sync::Once;

/// Logger setup for binaries.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. `"debug"` or
    /// `"lumen_obj=trace,wgpu_core=warn"`. Takes precedence over `RUST_LOG`.
    pub filter: Option<String>,

    /// ANSI coloring.
    pub write_style: env_logger::WriteStyle,

    /// Millisecond timestamps on each record; useful when reading frame timing.
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: true,
        }
    }
}

/// Applied when neither the config nor `RUST_LOG` names a filter.
///
/// wgpu's internals are chatty at `info`; keep them at `warn` unless asked.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

static INIT: Once = Once::new();

/// Filter precedence: explicit config, then `RUST_LOG`, then [`DEFAULT_FILTER`].
/// Blank sources are skipped.
fn resolve_filter(explicit: Option<String>, env: Option<String>) -> String {
    let non_blank = |f: &String| !f.trim().is_empty();
    explicit
        .filter(non_blank)
        .or_else(|| env.filter(non_blank))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Installs `env_logger` as the global logger. Only the first call has any
/// effect; call it early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.filter, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        if config.timestamps {
            builder.format_timestamp_millis();
        } else {
            builder.format_timestamp(None);
        }

        // A test harness may already own the global logger.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized with filter `{filter}`");
        }
    });
}
