//! Hostname to single address resolution.

use super::{retry::BackoffRetrier, Name, Resolve};
use crate::base::neterror::NetError;
use std::{net::IpAddr, sync::Arc};

/// Resolves a name to one address, preferring IPv4.
///
/// The scan stops at the first IPv4 address. The first IPv6 address is kept
/// as a fallback in case no IPv4 address follows.
#[derive(Clone)]
pub struct HostnameResolver {
    inner: Arc<dyn Resolve>,
    retrier: BackoffRetrier,
}

impl HostnameResolver {
    pub fn new(inner: Arc<dyn Resolve>, retrier: BackoffRetrier) -> Self {
        Self { inner, retrier }
    }

    /// Resolves `name`, retrying per the retrier's hostname policy.
    ///
    /// Literal IP addresses are returned without a lookup.
    pub async fn resolve(&self, name: &str) -> Result<IpAddr, NetError> {
        if let Ok(ip) = name.parse::<IpAddr>() {
            return Ok(ip);
        }
        if name.is_empty() {
            return Err(NetError::host_not_found(name));
        }

        self.retrier
            .run(
                name,
                || self.resolve_once(name),
                |result| self.retrier.hostname_verdict(name, result),
            )
            .await
    }

    async fn resolve_once(&self, name: &str) -> Result<IpAddr, NetError> {
        let addrs = self.inner.resolve(Name::new(name)).await?;
        pick_address(addrs).ok_or_else(|| NetError::host_not_found(name))
    }
}

impl std::fmt::Debug for HostnameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostnameResolver")
            .field("retrier", &self.retrier)
            .finish_non_exhaustive()
    }
}

/// First IPv4 address, else first IPv6 address.
pub fn pick_address(addrs: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    let mut v6 = None;
    for addr in addrs {
        match addr {
            IpAddr::V4(_) => return Some(addr),
            IpAddr::V6(_) if v6.is_none() => v6 = Some(addr),
            IpAddr::V6(_) => {}
        }
    }
    v6
}
