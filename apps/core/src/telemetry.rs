use crate::config::LogFormat;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const SERVICE_NAME: &str = "moodchat";

/// Installs the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` (default `info`). `LogFormat::Json` emits bunyan records
/// on stdout. Calling this twice is harmless; the second call is ignored.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (pretty, bunyan) = match format {
        LogFormat::Pretty => (Some(fmt::layer().with_target(false)), None),
        LogFormat::Json => (
            None,
            Some(
                JsonStorageLayer
                    .and_then(BunyanFormattingLayer::new(SERVICE_NAME.to_string(), std::io::stdout)),
            ),
        ),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(bunyan)
        .try_init();
}
