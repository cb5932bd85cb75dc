//! DNS Resolution Module
//!
//! Turns symbolic peer endpoints into literal addresses:
//! - [`HostnameResolver`]: name to one address, IPv4 preferred
//! - [`SrvResolver`]: service record to target, then to an address
//! - [`TxtResolver`]: `host:port` encoded in a text record
//!
//! All three wrap their lookups in a [`BackoffRetrier`] so that resolution
//! keeps trying while DNS is still unavailable early in boot.
//!
//! # Architecture
//!
//! The lookup primitives are traits ([`Resolve`] for addresses,
//! [`LookupRecords`] for SRV/TXT) so the resolvers can run against the system
//! resolver ([`GaiResolver`]), hickory-dns ([`HickoryResolver`]) or a test
//! double.
//!
//! # Example
//!
//! ```rust,ignore
//! use peerdns::dns::{HickoryResolver, HostnameResolver, BackoffRetrier};
//! use std::sync::Arc;
//!
//! let resolver = HostnameResolver::new(Arc::new(HickoryResolver::new()), BackoffRetrier::default());
//! let addr = resolver.resolve("vpn.example.com").await?;
//! ```

#[cfg(unix)]
mod gai;
mod hickory;
pub mod hostname;
mod resolve;
pub mod retry;
pub mod srv;
pub mod txt;

#[cfg(unix)]
pub use gai::GaiResolver;
pub use hickory::HickoryResolver;
pub use hostname::HostnameResolver;
pub use resolve::{
    Addrs, LookupRecords, Name, Resolve, Resolving, SrvLookup, SrvTarget, TxtLookup,
};
pub use retry::{BackoffRetrier, RetryPolicy, Verdict};
pub use srv::{SrvResolution, SrvResolver};
pub use txt::{parse_txt_endpoint, TxtResolver, TxtTarget};
