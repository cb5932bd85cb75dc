//! Rewrites every peer endpoint in a [`Config`] to a literal address.

use super::endpoint::{Config, Endpoint, ResolutionMode};
use crate::base::{boot::BootContext, neterror::NetError};
use crate::dns::{
    BackoffRetrier, HickoryResolver, HostnameResolver, LookupRecords, Resolve, RetryPolicy,
    SrvResolver, TxtResolver,
};
use std::sync::Arc;

/// Dispatches each peer endpoint to the hostname, SRV or TXT resolver.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    hostname: HostnameResolver,
    srv: SrvResolver,
    txt: TxtResolver,
}

impl EndpointResolver {
    pub fn new(
        addrs: Arc<dyn Resolve>,
        records: Arc<dyn LookupRecords>,
        retrier: BackoffRetrier,
    ) -> Self {
        let hostname = HostnameResolver::new(addrs, retrier.clone());
        Self {
            srv: SrvResolver::new(records.clone(), hostname.clone(), retrier.clone()),
            txt: TxtResolver::new(records, retrier),
            hostname,
        }
    }

    /// Resolver backed by the operating system for addresses and hickory-dns
    /// for SRV/TXT records.
    pub fn system(boot: BootContext) -> Self {
        Self::with_retrier(BackoffRetrier::new(RetryPolicy::default(), boot))
    }

    /// Like [`EndpointResolver::system`], with a caller-built retrier (for a
    /// custom policy or a shutdown listener).
    pub fn with_retrier(retrier: BackoffRetrier) -> Self {
        let hickory = Arc::new(HickoryResolver::new());
        #[cfg(unix)]
        let addrs: Arc<dyn Resolve> = Arc::new(crate::dns::GaiResolver::new());
        #[cfg(not(unix))]
        let addrs: Arc<dyn Resolve> = hickory.clone();
        Self::new(addrs, hickory, retrier)
    }

    /// Resolves every non-empty peer endpoint in order, in place.
    ///
    /// Stops at the first failure and returns that error unchanged. Peers
    /// before it stay resolved; peers after it are untouched.
    pub async fn resolve_endpoints(&self, config: &mut Config) -> Result<(), NetError> {
        for (index, peer) in config.peers.iter_mut().enumerate() {
            if peer.endpoint.is_empty() {
                continue;
            }
            if let Err(err) = self.resolve_endpoint(&mut peer.endpoint).await {
                tracing::warn!(peer = index, error = %err, "endpoint resolution failed");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Resolves one endpoint in place according to its mode.
    pub async fn resolve_endpoint(&self, endpoint: &mut Endpoint) -> Result<(), NetError> {
        match endpoint.mode {
            ResolutionMode::Srv => {
                tracing::info!(domain = %endpoint.host, "SRV record start resolve");
                let resolved = self.srv.resolve(&endpoint.host).await?;
                endpoint.host = resolved.address.to_string();
                endpoint.port = resolved.port;
            }
            ResolutionMode::Txt => {
                tracing::info!(domain = %endpoint.host, "TXT record start resolve");
                let resolved = self.txt.resolve(&endpoint.host).await?;
                endpoint.host = resolved.host;
                endpoint.port = resolved.port;
            }
            ResolutionMode::Plain => {
                tracing::debug!(domain = %endpoint.host, "resolving endpoint hostname");
                let address = self.hostname.resolve(&endpoint.host).await?;
                endpoint.host = address.to_string();
            }
        }
        endpoint.mode = ResolutionMode::Plain;
        tracing::debug!(endpoint = %endpoint, "endpoint resolved");
        Ok(())
    }
}

impl Config {
    /// Resolves all peer endpoints with the system resolvers.
    ///
    /// See [`EndpointResolver::resolve_endpoints`] for failure behavior.
    pub async fn resolve_endpoints(&mut self, boot: BootContext) -> Result<(), NetError> {
        EndpointResolver::system(boot).resolve_endpoints(self).await
    }
}
