use crate::error::ExporterError;
use clap::Parser;
use std::{net::SocketAddr, time::Duration};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address on which to expose metrics and the landing page
    #[arg(long = "web.listen-address", default_value = "0.0.0.0:9558")]
    pub listen_address: SocketAddr,

    /// Path under which to expose metrics
    #[arg(long = "web.telemetry-path", default_value = "/metrics")]
    pub telemetry_path: String,

    /// Deadline for each D-Bus call, in seconds
    #[arg(long = "dbus.timeout", value_name = "SECONDS", default_value_t = 5)]
    pub dbus_timeout: u64,

    /// Log filter used when RUST_LOG is not set (e.g. 'info', 'debug')
    #[arg(long = "log.level", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub call_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub listen_address: SocketAddr,
    pub telemetry_path: String,
    pub log_level: String,
    pub collector: CollectorConfig,
}

impl TryFrom<Args> for ExporterConfig {
    type Error = ExporterError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if !args.telemetry_path.starts_with('/') || args.telemetry_path == "/" {
            return Err(ExporterError::Config(format!(
                "telemetry path '{}' must start with '/' and must not be the root path",
                args.telemetry_path
            )));
        }
        if let Some(reason) = route_pattern_syntax(&args.telemetry_path) {
            return Err(ExporterError::Config(format!(
                "telemetry path '{}' {}",
                args.telemetry_path, reason
            )));
        }
        if args.dbus_timeout == 0 {
            return Err(ExporterError::Config(
                "D-Bus timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            listen_address: args.listen_address,
            telemetry_path: args.telemetry_path,
            log_level: args.log_level,
            collector: CollectorConfig {
                call_timeout: Duration::from_secs(args.dbus_timeout),
            },
        })
    }
}

/// Reports router pattern syntax in a literal path (captures and wildcards).
fn route_pattern_syntax(path: &str) -> Option<&'static str> {
    if path.contains(['{', '}']) {
        return Some("must not contain '{' or '}'");
    }
    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Some("must not have segments starting with ':' or '*'");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["networkd-exporter"]).unwrap();
        let config = ExporterConfig::try_from(args).unwrap();

        assert_eq!(config.listen_address, "0.0.0.0:9558".parse::<SocketAddr>().unwrap());
        assert_eq!(config.telemetry_path, "/metrics");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.collector.call_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_explicit_args() {
        let args = Args::try_parse_from([
            "networkd-exporter",
            "--web.listen-address",
            "127.0.0.1:9100",
            "--web.telemetry-path",
            "/networkd",
            "--dbus.timeout",
            "2",
            "--log.level",
            "debug",
        ])
        .unwrap();
        let config = ExporterConfig::try_from(args).unwrap();

        assert_eq!(config.listen_address, "127.0.0.1:9100".parse::<SocketAddr>().unwrap());
        assert_eq!(config.telemetry_path, "/networkd");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.collector.call_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_rejects_invalid_telemetry_path() {
        for path in [
            "metrics",
            "/",
            "/metrics/:node",
            "/metrics/*rest",
            "/metrics/{node}",
            "/metrics}",
        ] {
            let args =
                Args::try_parse_from(["networkd-exporter", "--web.telemetry-path", path]).unwrap();
            assert!(matches!(
                ExporterConfig::try_from(args),
                Err(ExporterError::Config(_))
            ));
        }
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let args = Args::try_parse_from(["networkd-exporter", "--dbus.timeout", "0"]).unwrap();
        assert!(matches!(
            ExporterConfig::try_from(args),
            Err(ExporterError::Config(_))
        ));
    }
}
