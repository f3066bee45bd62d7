//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the echo
//! server. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the echo server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EchoConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Deployment variant and route-table switches.
    pub routes: RoutesConfig,

    /// DNS lookup settings for `/dns/:domains`.
    pub dns: DnsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Overridden by the `PORT` environment variable.
    pub port: u16,
}

impl ListenerConfig {
    /// The `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Port used when neither the config file nor `PORT` provide one.
pub const DEFAULT_PORT: u16 = 9000;

/// Deployment preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Runs on its own: trusts `X-Forwarded-For` and serves `/dns`.
    #[default]
    Standalone,
    /// Runs behind a hosting platform: socket peer only, no `/dns`.
    Hosted,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Standalone => write!(f, "standalone"),
            Variant::Hosted => write!(f, "hosted"),
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standalone" => Ok(Variant::Standalone),
            "hosted" => Ok(Variant::Hosted),
            other => Err(format!("unknown variant `{other}` (expected standalone or hosted)")),
        }
    }
}

/// Where `/ip` reads the client address from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientIpSource {
    /// `X-Forwarded-For` if present, else the socket peer.
    ForwardedFor,
    /// Always the socket peer.
    Socket,
}

/// Route-table configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutesConfig {
    /// Preset selecting the defaults below.
    pub variant: Variant,

    /// Register `/dns/:domains` (defaults to the variant's choice).
    pub dns_enabled: Option<bool>,

    /// Client IP source for `/ip` (defaults to the variant's choice).
    pub client_ip: Option<ClientIpSource>,
}

impl RoutesConfig {
    pub fn dns_enabled(&self) -> bool {
        self.dns_enabled
            .unwrap_or(matches!(self.variant, Variant::Standalone))
    }

    pub fn client_ip_source(&self) -> ClientIpSource {
        self.client_ip.unwrap_or(match self.variant {
            Variant::Standalone => ClientIpSource::ForwardedFor,
            Variant::Hosted => ClientIpSource::Socket,
        })
    }
}

/// DNS lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DnsConfig {
    /// Per-domain lookup deadline in milliseconds.
    pub timeout_ms: u64,

    /// Lookups one request may have in flight at once.
    pub max_concurrent: usize,

    /// Domains one request may list.
    pub max_domains: usize,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            max_concurrent: 16,
            max_domains: 64,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body read into memory, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing filter directive, used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "echo_server=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
