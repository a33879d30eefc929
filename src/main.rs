//! SBIOT Console - Main Entry Point
//!
//! Headless administrative console for SBIOT Modbus-to-network gateways.

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use sbiot_console::app::ConsoleSession;
use sbiot_console::connection::{GatewayEndpoint, get_endpoint_by_name, get_endpoints};
use sbiot_console::helpers::get_or_create_data_dir;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_dir = get_or_create_data_dir().context("resolving log directory")?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "sbiot-console.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    let endpoint = select_endpoint().context("selecting gateway endpoint")?;
    tracing::info!("Connecting to {}", endpoint.display_name());

    let mut session = ConsoleSession::new(endpoint)?;
    session.load().await.context("loading gateway configuration")?;
    session.start_telemetry()?;

    let mut tick = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            _ = tick.tick() => {
                if session.pump_events() > 0 {
                    for line in session.dashboard_lines() {
                        tracing::info!("{line}");
                    }
                }
            }
        }
    }

    session.stop_telemetry();
    Ok(())
}

/// Pick the gateway to connect to: a saved endpoint named on the command
/// line, a bare `host[:port]`, or the first saved endpoint.
fn select_endpoint() -> anyhow::Result<GatewayEndpoint> {
    match std::env::args().nth(1) {
        Some(arg) => {
            if let Ok(endpoint) = get_endpoint_by_name(&arg) {
                return Ok(endpoint);
            }
            let (host, port) = match arg.rsplit_once(':') {
                Some((host, port)) => (
                    host.to_string(),
                    port.parse().context("parsing gateway port")?,
                ),
                None => (arg, 80),
            };
            Ok(GatewayEndpoint::new("", host, port))
        }
        None => {
            let endpoints = get_endpoints()?;
            endpoints
                .into_iter()
                .next()
                .context("no saved gateways; pass host[:port] or a saved name")
        }
    }
}
