//! Metric descriptors, measurements and text exposition
//!
//! Descriptors are static metric identities validated once at start-up.
//! Measurements are the per-cycle values pushed into a [`MetricSink`] and
//! later rendered in the Prometheus text format.

use crate::error::ExporterError;
use prometheus::{core::Desc, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::{collections::HashMap, sync::Arc};

pub const NAMESPACE: &str = "networkd";

/// Joins the non-empty name parts with underscores.
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    fq_name: String,
    help: &'static str,
    variable_labels: &'static [&'static str],
}

impl Descriptor {
    /// Builds a descriptor, rejecting names or labels Prometheus would refuse.
    pub fn new(
        namespace: &str,
        subsystem: &str,
        name: &str,
        help: &'static str,
        variable_labels: &'static [&'static str],
    ) -> Result<Self, prometheus::Error> {
        let fq_name = build_fq_name(namespace, subsystem, name);
        Desc::new(
            fq_name.clone(),
            help.to_string(),
            variable_labels.iter().map(|l| l.to_string()).collect(),
            HashMap::new(),
        )?;

        Ok(Self {
            fq_name,
            help,
            variable_labels,
        })
    }

    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    pub fn help(&self) -> &str {
        self.help
    }

    pub fn variable_labels(&self) -> &[&'static str] {
        self.variable_labels
    }
}

/// A single gauge value for one descriptor and label set.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    descriptor: Arc<Descriptor>,
    value: f64,
    label_values: Vec<String>,
}

impl Measurement {
    pub fn gauge(descriptor: &Arc<Descriptor>, value: f64, label_values: Vec<String>) -> Self {
        debug_assert_eq!(
            descriptor.variable_labels().len(),
            label_values.len(),
            "label cardinality mismatch for {}",
            descriptor.fq_name()
        );
        Self {
            descriptor: Arc::clone(descriptor),
            value,
            label_values,
        }
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label_values(&self) -> &[String] {
        &self.label_values
    }
}

/// Receives measurements emitted by a collection cycle.
pub trait MetricSink {
    fn push(&mut self, measurement: Measurement);
}

impl MetricSink for Vec<Measurement> {
    fn push(&mut self, measurement: Measurement) {
        Vec::push(self, measurement);
    }
}

/// Renders measurements in the Prometheus text format.
///
/// Every descriptor becomes one gauge family. Families without measurements
/// are left out of the output.
pub fn render_text(
    descriptors: &[Arc<Descriptor>],
    measurements: &[Measurement],
) -> Result<String, ExporterError> {
    let registry = Registry::new();
    let mut families: HashMap<&str, GaugeVec> = HashMap::new();

    for descriptor in descriptors {
        let family = GaugeVec::new(
            Opts::new(descriptor.fq_name(), descriptor.help()),
            descriptor.variable_labels(),
        )?;
        registry.register(Box::new(family.clone()))?;
        families.insert(descriptor.fq_name(), family);
    }

    for measurement in measurements {
        let name = measurement.descriptor().fq_name();
        let Some(family) = families.get(name) else {
            tracing::warn!("Dropping measurement for undescribed metric {}", name);
            continue;
        };
        let label_values: Vec<&str> = measurement
            .label_values()
            .iter()
            .map(String::as_str)
            .collect();
        family
            .get_metric_with_label_values(&label_values)?
            .set(measurement.value());
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ExporterError::Render(prometheus::Error::Msg(e.to_string())))
}
