//! # peerdns
//!
//! Resolution of symbolic tunnel peer endpoints into literal `IP:port` pairs.
//!
//! Peer endpoints may be plain hostnames, SRV service names, or names whose
//! TXT record carries `host:port`. Resolution tolerates the flaky DNS of a
//! machine that is still booting: lookups are retried at a fixed interval,
//! with a larger budget when the process was started at boot.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use peerdns::base::boot::BootContext;
//! use peerdns::conf::{Config, Endpoint, Peer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut config = Config {
//!         peers: vec![Peer::with_endpoint(Endpoint::new("_wireguard._udp.example.com", 0))],
//!     };
//!     config.resolve_endpoints(BootContext::interactive()).await.unwrap();
//!     println!("Peer at {}", config.peers[0].endpoint);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Errors, error context helpers and boot context
//! - [`dns`] - Lookup primitives, retry policy and the three resolvers
//! - [`conf`] - Peer/endpoint model and the endpoint resolution pass

pub mod base;
pub mod conf;
pub mod dns;
