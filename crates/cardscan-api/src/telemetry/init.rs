use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter,
    Registry,
};

const DEFAULT_FILTER: &str = "cardscan=info,tower_http=info";
const DEBUG_FILTER: &str = "cardscan=debug,tower_http=debug";

/// Handle for raising the log level once configuration is known.
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogLevelHandle {
    /// Switch to debug output. An explicit `RUST_LOG` always wins.
    pub fn enable_debug(&self) -> anyhow::Result<()> {
        if self.from_env {
            return Ok(());
        }
        self.handle
            .reload(EnvFilter::new(DEBUG_FILTER))
            .map_err(|e| anyhow::anyhow!("Failed to raise log level: {}", e))?;
        tracing::debug!("Debug logging enabled");
        Ok(())
    }
}

/// Initialize console tracing.
///
/// Honors `RUST_LOG`; otherwise logs the service and HTTP layer at info.
pub fn init_telemetry() -> anyhow::Result<LogLevelHandle> {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(DEFAULT_FILTER), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(console_fmt)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(LogLevelHandle { handle, from_env })
}
