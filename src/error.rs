use crate::networkd::BusError;
use std::{io, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExporterError {
    #[error("Could not get D-Bus connection: {0}")]
    Connect(#[source] BusError),

    #[error("D-Bus {operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Invalid metric descriptor '{name}'")]
    Descriptor {
        name: &'static str,
        #[source]
        source: prometheus::Error,
    },

    #[error("Failed to render metrics")]
    Render(#[from] prometheus::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[from] io::Error),
}
