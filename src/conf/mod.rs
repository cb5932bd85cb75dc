//! Tunnel configuration model and endpoint resolution.
//!
//! A [`Config`] holds peers whose endpoints may name a host, an SRV record
//! or a TXT record. [`EndpointResolver`] rewrites them in place to literal
//! addresses before the tunnel is brought up.

mod endpoint;
mod resolve;

pub use endpoint::{
    Config, Endpoint, ParseEndpointError, Peer, ResolutionMode, SRV_MARKER_PORT, TXT_MARKER_PORT,
};
pub use resolve::EndpointResolver;
