use clap::Parser;
use networkd_exporter::{server, Args, ExporterConfig, NetworkdCollector, SystemBusConnector};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError>> {
    let args = Args::parse();
    let config = ExporterConfig::try_from(args)?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        "Starting networkd-exporter version {}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::debug!("Configuration: {:?}", config);

    let collector = NetworkdCollector::new(
        config.collector.clone(),
        SystemBusConnector,
        tracing::info_span!("networkd"),
    )?;

    server::serve(&config, collector).await?;
    Ok(())
}
