//! networkd collector
//!
//! One call to [`NetworkdCollector::collect`] is one snapshot:
//! - Connect to the bus (fatal on failure)
//! - List links (warning and no output on failure)
//! - Read each link's DHCP server leases (debug log and skip on failure)
//!
//! The bus connection is owned by the cycle and dropped on every exit path.


use crate::{
    config::CollectorConfig,
    error::ExporterError,
    metrics::{Descriptor, Measurement, MetricSink, NAMESPACE},
    networkd::BusConnector,
};
use std::{sync::Arc, time::Duration};
use tokio::time;
use tracing::{Instrument, Span};

pub struct NetworkdCollector {
    connector: Box<dyn BusConnector>,
    call_timeout: Duration,
    span: Span,
    leases: Arc<Descriptor>,
    links: Arc<Descriptor>,
}

impl NetworkdCollector {
    /// Creates a collector that opens connections through `connector` and
    /// records its log events under `span`.
    pub fn new(
        config: CollectorConfig,
        connector: impl BusConnector + 'static,
        span: Span,
    ) -> Result<Self, ExporterError> {
        let leases = Descriptor::new(
            NAMESPACE,
            "",
            "dhcpserver_leases_total",
            "networkd DHCP server leases",
            &["iface"],
        )
        .map_err(|source| ExporterError::Descriptor {
            name: "dhcpserver_leases_total",
            source,
        })?;
        let links = Descriptor::new(NAMESPACE, "", "links_total", "networkd links", &[])
            .map_err(|source| ExporterError::Descriptor {
                name: "links_total",
                source,
            })?;

        Ok(Self {
            connector: Box::new(connector),
            call_timeout: config.call_timeout,
            span,
            leases: Arc::new(leases),
            links: Arc::new(links),
        })
    }

    /// The static descriptors of every metric this collector can emit.
    pub fn describe(&self) -> Vec<Arc<Descriptor>> {
        vec![Arc::clone(&self.leases), Arc::clone(&self.links)]
    }

    /// Runs one cycle and logs a fatal error instead of returning it.
    pub async fn scrape<S>(&self, sink: &mut S)
    where
        S: MetricSink + Send,
    {
        if let Err(e) = self.collect(sink).await {
            self.span
                .in_scope(|| tracing::error!("Error collecting metrics: {}", e));
        }
    }

    /// Runs one collection cycle, pushing measurements into `sink`.
    ///
    /// Only a failure to reach the bus is returned as an error.
    pub async fn collect<S>(&self, sink: &mut S) -> Result<(), ExporterError>
    where
        S: MetricSink + Send,
    {
        self.collect_inner(sink).instrument(self.span.clone()).await
    }

    async fn collect_inner<S>(&self, sink: &mut S) -> Result<(), ExporterError>
    where
        S: MetricSink + Send,
    {
        let bus = match time::timeout(self.call_timeout, self.connector.connect()).await {
            Ok(Ok(bus)) => bus,
            Ok(Err(e)) => return Err(ExporterError::Connect(e)),
            Err(_) => {
                return Err(ExporterError::Timeout {
                    operation: "connect",
                    timeout: self.call_timeout,
                })
            }
        };

        let links = match time::timeout(self.call_timeout, bus.list_links()).await {
            Ok(Ok(links)) => links,
            Ok(Err(e)) => {
                tracing::warn!("Unable to list networkd links: {}", e);
                return Ok(());
            }
            Err(_) => {
                tracing::warn!(
                    "Unable to list networkd links: timed out after {:?}",
                    self.call_timeout
                );
                return Ok(());
            }
        };

        sink.push(Measurement::gauge(&self.links, links.len() as f64, Vec::new()));

        for link in &links {
            match time::timeout(self.call_timeout, bus.dhcp_server_leases(&link.path)).await {
                Ok(Ok(count)) => {
                    sink.push(Measurement::gauge(
                        &self.leases,
                        count as f64,
                        vec![link.name.clone()],
                    ));
                }
                Ok(Err(e)) => {
                    tracing::debug!("No leases found for interface {}: {}", link.name, e);
                }
                Err(_) => {
                    tracing::debug!(
                        "No leases found for interface {}: timed out after {:?}",
                        link.name,
                        self.call_timeout
                    );
                }
            }
        }

        Ok(())
    }
}
