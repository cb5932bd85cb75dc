//! Peer endpoint data model.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Port value that historically selected SRV resolution.
pub const SRV_MARKER_PORT: u16 = 0;
/// Port value that historically selected TXT resolution.
pub const TXT_MARKER_PORT: u16 = 1;

/// How an endpoint's host is turned into an address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Resolve `host` as a hostname and keep `port`.
    #[default]
    Plain,
    /// `host` names an SRV record supplying target and port.
    Srv,
    /// `host` names a TXT record holding `host:port`.
    Txt,
}

impl ResolutionMode {
    /// Mode implied by the legacy port markers: 0 is SRV, 1 is TXT.
    pub fn from_port(port: u16) -> Self {
        match port {
            SRV_MARKER_PORT => ResolutionMode::Srv,
            TXT_MARKER_PORT => ResolutionMode::Txt,
            _ => ResolutionMode::Plain,
        }
    }
}

/// Where to reach a peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EndpointRepr")]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub mode: ResolutionMode,
}

impl Endpoint {
    /// Builds an endpoint, reading the legacy port markers into `mode`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            mode: ResolutionMode::from_port(port),
        }
    }

    pub fn with_mode(host: impl Into<String>, port: u16, mode: ResolutionMode) -> Self {
        Self {
            host: host.into(),
            port,
            mode,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_empty()
    }
}

/// Serialized form; configs written before `mode` existed omit it.
#[derive(Deserialize)]
struct EndpointRepr {
    host: String,
    #[serde(default)]
    port: u16,
    #[serde(default)]
    mode: Option<ResolutionMode>,
}

impl From<EndpointRepr> for Endpoint {
    fn from(repr: EndpointRepr) -> Self {
        let mode = repr
            .mode
            .unwrap_or_else(|| ResolutionMode::from_port(repr.port));
        Endpoint::with_mode(repr.host, repr.port, mode)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseEndpointError {
    #[error("Missing port in endpoint {0:?}")]
    MissingPort(String),
    #[error("Invalid port in endpoint {0:?}")]
    InvalidPort(String),
    #[error("Unbracketed IPv6 address in endpoint {0:?}")]
    UnbracketedIpv6(String),
    #[error("Empty host in endpoint {0:?}")]
    EmptyHost(String),
}

impl FromStr for Endpoint {
    type Err = ParseEndpointError;

    /// Parses `host:port` or `[ipv6]:port`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| ParseEndpointError::MissingPort(s.to_string()))?;

        let host = match host.strip_prefix('[') {
            Some(inner) => inner
                .strip_suffix(']')
                .ok_or_else(|| ParseEndpointError::UnbracketedIpv6(s.to_string()))?,
            None if host.contains(':') => {
                return Err(ParseEndpointError::UnbracketedIpv6(s.to_string()))
            }
            None => host,
        };
        if host.is_empty() {
            return Err(ParseEndpointError::EmptyHost(s.to_string()));
        }

        let port = port
            .parse::<u16>()
            .map_err(|_| ParseEndpointError::InvalidPort(s.to_string()))?;
        Ok(Endpoint::new(host, port))
    }
}

/// One tunnel peer. Only the endpoint matters to resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub endpoint: Endpoint,
    #[serde(default)]
    pub allowed_ips: Vec<String>,
}

impl Peer {
    pub fn with_endpoint(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            ..Default::default()
        }
    }
}

/// Tunnel configuration, as far as endpoint resolution is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub peers: Vec<Peer>,
}
