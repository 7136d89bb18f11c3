//! # networkd-exporter - systemd-networkd statistics for Prometheus
//!
//! networkd-exporter reads link and DHCP server state from systemd-networkd
//! over the D-Bus system bus and exposes it as Prometheus gauges. Every
//! scrape is an independent snapshot: a fresh bus connection is opened,
//! the links are enumerated, each link's DHCP server leases are counted,
//! and the connection is closed again.
//!
//! ## Metrics
//!
//! - `networkd_links_total`: number of links known to networkd
//! - `networkd_dhcpserver_leases_total{iface}`: leases handed out by each
//!   link that runs a DHCP server
//!
//! ## Example
//!
//! ```rust,no_run
//! use networkd_exporter::{CollectorConfig, Measurement, NetworkdCollector, SystemBusConnector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let collector = NetworkdCollector::new(
//!         CollectorConfig::default(),
//!         SystemBusConnector,
//!         tracing::info_span!("networkd"),
//!     )?;
//!     let mut measurements: Vec<Measurement> = Vec::new();
//!     collector.collect(&mut measurements).await?;
//!     println!("{:?}", measurements);
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod metrics;
pub mod networkd;
pub mod server;

pub use collector::NetworkdCollector;
pub use config::{Args, CollectorConfig, ExporterConfig};
pub use error::ExporterError;
pub use metrics::{render_text, Descriptor, Measurement, MetricSink};
pub use networkd::{BusConnector, BusError, LinkRecord, NetworkdBus, SystemBusConnector};
