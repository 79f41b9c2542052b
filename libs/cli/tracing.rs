use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Diagnostics go to stderr so they never mix with command output.
/// Verbosity is driven by MIT_LOG (e.g. MIT_LOG=mit_core=debug); by
/// default only the store-degradation warnings come through.
pub fn setup() -> eyre::Result<()> {
    let env_filter = EnvFilter::try_from_env("MIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
