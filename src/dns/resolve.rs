//! Core DNS lookup types and traits.
//!
//! This module defines the primitives the endpoint resolvers are built on:
//! address lookups ([`Resolve`]) and SRV/TXT record lookups
//! ([`LookupRecords`]).

use crate::base::neterror::NetError;
use std::{fmt, future::Future, net::IpAddr, pin::Pin, sync::Arc};

/// A domain name to look up.
///
/// This is a lightweight wrapper around a hostname string that provides
/// a type-safe way to pass domain names to resolvers.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// One service record: where the service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvTarget {
    pub target: String,
    pub port: u16,
}

impl SrvTarget {
    pub fn new(target: impl Into<String>, port: u16) -> Self {
        Self {
            target: target.into(),
            port,
        }
    }
}

/// Alias for an `Iterator` trait object over addresses, in resolver order.
pub type Addrs = Box<dyn Iterator<Item = IpAddr> + Send>;

/// Alias for the `Future` type returned by an address resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Addrs, NetError>> + Send>>;

/// Alias for the `Future` type returned by an SRV lookup.
pub type SrvLookup = Pin<Box<dyn Future<Output = Result<Vec<SrvTarget>, NetError>> + Send>>;

/// Alias for the `Future` type returned by a TXT lookup.
pub type TxtLookup = Pin<Box<dyn Future<Output = Result<Vec<String>, NetError>> + Send>>;

/// System name resolution primitive.
///
/// Implementations query both address families at once and must classify
/// failures as [`NetError::TryAgain`], [`NetError::HostNotFound`] or a
/// terminal error so the retry policy can act on them.
pub trait Resolve: Send + Sync {
    /// Resolves a domain name to IPv4 and IPv6 addresses.
    ///
    /// Addresses are yielded in the order the resolver returned them.
    fn resolve(&self, name: Name) -> Resolving;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }
}

/// Service-record and text-record lookup primitives.
pub trait LookupRecords: Send + Sync {
    /// Looks up SRV records for `name`, in the order received.
    fn lookup_srv(&self, name: Name) -> SrvLookup;

    /// Looks up TXT records for `name`, one string per record, in the order
    /// received.
    fn lookup_txt(&self, name: Name) -> TxtLookup;
}

impl<R: LookupRecords + ?Sized> LookupRecords for Arc<R> {
    fn lookup_srv(&self, name: Name) -> SrvLookup {
        (**self).lookup_srv(name)
    }

    fn lookup_txt(&self, name: Name) -> TxtLookup {
        (**self).lookup_txt(name)
    }
}
