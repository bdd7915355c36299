use crate::config::ServerConfig;
use common::TelemetryGuard;

/// Install the subscriber, exporting over OTLP when an endpoint is set.
///
/// Keep the returned guard alive for the lifetime of the server.
pub fn setup_logging(config: &ServerConfig) -> anyhow::Result<Option<TelemetryGuard>> {
    match config.otel_endpoint.as_deref() {
        Some(endpoint) => Ok(Some(TelemetryGuard::init(
            "chestscan",
            endpoint,
            config.environment,
        )?)),
        None => {
            common::setup_logging(config.environment);
            Ok(None)
        }
    }
}
