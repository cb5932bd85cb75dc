//! Async DNS resolver using hickory-dns.
//!
//! This resolver provides fully async DNS resolution and is the only backend
//! that can answer SRV and TXT queries:
//! - Address lookups (IPv4 + IPv6 in one query)
//! - Service discovery (SRV)
//! - Text records (TXT)
//! - System DNS configuration auto-detection

use super::{Addrs, LookupRecords, Name, Resolve, Resolving, SrvLookup, SrvTarget, TxtLookup};
use crate::base::context::LookupResultExt;
use hickory_resolver::{
    config::{LookupIpStrategy, ResolverConfig},
    name_server::TokioConnectionProvider,
    TokioResolver,
};
use std::{net::IpAddr, sync::LazyLock};

/// Async DNS resolver backed by hickory-dns.
///
/// This resolver is lazily initialized on first use and shared across
/// all instances via a static `LazyLock`. It automatically configures
/// itself based on the system's DNS settings.
///
/// # Example
///
/// ```rust,ignore
/// use peerdns::dns::{HickoryResolver, LookupRecords, Name};
///
/// let resolver = HickoryResolver::new();
/// let records = resolver.lookup_srv(Name::new("_wireguard._udp.example.com")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HickoryResolver {
    resolver: &'static LazyLock<TokioResolver>,
}

impl HickoryResolver {
    /// Creates a new `HickoryResolver`.
    ///
    /// The underlying resolver is lazily initialized on first DNS query.
    /// It will attempt to read system DNS configuration; if that fails,
    /// it falls back to sensible defaults.
    pub fn new() -> Self {
        static RESOLVER: LazyLock<TokioResolver> = LazyLock::new(|| {
            let mut builder = match TokioResolver::builder_tokio() {
                Ok(builder) => {
                    tracing::debug!("Using system DNS configuration");
                    builder
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Failed to read system DNS config, using defaults"
                    );
                    TokioResolver::builder_with_config(
                        ResolverConfig::default(),
                        TokioConnectionProvider::default(),
                    )
                }
            };

            builder.options_mut().ip_strategy = LookupIpStrategy::Ipv4AndIpv6;

            builder.build()
        });

        Self {
            resolver: &RESOLVER,
        }
    }
}

impl Default for HickoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolve for HickoryResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let domain = name.as_str();
            tracing::debug!(domain = %domain, "resolving via hickory-dns");

            let lookup = resolver
                .resolver
                .lookup_ip(domain)
                .await
                .host_context(domain)?;

            let addrs: Vec<IpAddr> = lookup.iter().collect();
            tracing::debug!(domain = %domain, count = addrs.len(), "hickory-dns resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

impl LookupRecords for HickoryResolver {
    fn lookup_srv(&self, name: Name) -> SrvLookup {
        let resolver = self.clone();
        Box::pin(async move {
            let domain = name.as_str();
            tracing::debug!(domain = %domain, "SRV lookup via hickory-dns");

            let lookup = resolver
                .resolver
                .srv_lookup(domain)
                .await
                .lookup_context(domain)?;

            Ok(lookup
                .iter()
                .map(|srv| SrvTarget::new(trim_root(&srv.target().to_utf8()), srv.port()))
                .collect())
        })
    }

    fn lookup_txt(&self, name: Name) -> TxtLookup {
        let resolver = self.clone();
        Box::pin(async move {
            let domain = name.as_str();
            tracing::debug!(domain = %domain, "TXT lookup via hickory-dns");

            let lookup = resolver
                .resolver
                .txt_lookup(domain)
                .await
                .lookup_context(domain)?;

            Ok(lookup
                .iter()
                .map(|txt| {
                    txt.txt_data()
                        .iter()
                        .map(|chunk| String::from_utf8_lossy(chunk))
                        .collect::<String>()
                })
                .collect())
        })
    }
}

/// Drops the trailing root label dot from a fully-qualified name.
fn trim_root(name: &str) -> &str {
    match name.strip_suffix('.') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => name,
    }
}
