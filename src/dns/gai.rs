//! System DNS resolver using getaddrinfo.
//!
//! This resolver uses the operating system's native name resolution via
//! `getaddrinfo`, executed in a thread pool to avoid blocking the async runtime.
//!
//! # When to Use
//!
//! - When you need to respect system DNS configuration (/etc/resolv.conf,
//!   /etc/hosts, nsswitch, etc.)
//! - When the resolver must report `EAI_AGAIN` distinctly from
//!   "host not found", which the boot-time retry policy depends on

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::neterror::NetError;
use std::{
    ffi::CString,
    mem,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    ptr,
};

/// System DNS resolver using `getaddrinfo` in a thread pool.
///
/// Queries with `AF_UNSPEC` so IPv4 and IPv6 answers come back from a single
/// call, in the order the system resolver sorted them.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    /// Creates a new `GaiResolver`.
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let domain = name.as_str().to_string();
            let host = domain.clone();

            let result = tokio::task::spawn_blocking(move || {
                tracing::debug!(host = %host, "resolving via getaddrinfo");
                lookup_host(&host)
            })
            .await;

            // Handle task join error (cancellation, panic)
            let addrs = result.map_err(|e| {
                tracing::error!(error = %e, "DNS resolution task failed");
                NetError::Other {
                    domain: domain.clone(),
                    message: e.to_string(),
                }
            })??;

            tracing::debug!(domain = %domain, count = addrs.len(), "DNS resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

/// Owned `getaddrinfo` result list, released with `freeaddrinfo` on drop.
struct AddrInfoList {
    head: *mut libc::addrinfo,
}

impl AddrInfoList {
    fn iter(&self) -> AddrInfoIter<'_> {
        AddrInfoIter {
            cur: self.head,
            _list: self,
        }
    }
}

impl Drop for AddrInfoList {
    fn drop(&mut self) {
        if !self.head.is_null() {
            // SAFETY: head came from a successful getaddrinfo call and is freed once.
            unsafe { libc::freeaddrinfo(self.head) };
        }
    }
}

struct AddrInfoIter<'a> {
    cur: *mut libc::addrinfo,
    _list: &'a AddrInfoList,
}

impl Iterator for AddrInfoIter<'_> {
    type Item = Option<IpAddr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur.is_null() {
            return None;
        }
        // SAFETY: cur points into the list owned by `_list`, which outlives us.
        let info = unsafe { &*self.cur };
        self.cur = info.ai_next;
        Some(unsafe { sockaddr_to_ip(info) })
    }
}

/// Extracts the address of one `addrinfo` entry, skipping other families.
///
/// # Safety
///
/// `info.ai_addr` must point to a sockaddr of `info.ai_family`.
unsafe fn sockaddr_to_ip(info: &libc::addrinfo) -> Option<IpAddr> {
    if info.ai_addr.is_null() {
        return None;
    }
    match info.ai_family {
        libc::AF_INET => {
            let sin = &*(info.ai_addr as *const libc::sockaddr_in);
            Some(IpAddr::V4(Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr))))
        }
        libc::AF_INET6 => {
            let sin6 = &*(info.ai_addr as *const libc::sockaddr_in6);
            Some(IpAddr::V6(Ipv6Addr::from(sin6.sin6_addr.s6_addr)))
        }
        _ => None,
    }
}

fn lookup_host(host: &str) -> Result<Vec<IpAddr>, NetError> {
    let c_host = CString::new(host).map_err(|_| NetError::InvalidName {
        domain: host.to_string(),
    })?;

    // SAFETY: an all-zero addrinfo is a valid "no hints" value.
    let mut hints: libc::addrinfo = unsafe { mem::zeroed() };
    hints.ai_family = libc::AF_UNSPEC;
    hints.ai_socktype = libc::SOCK_DGRAM;
    hints.ai_protocol = libc::IPPROTO_UDP;

    let mut head: *mut libc::addrinfo = ptr::null_mut();
    // SAFETY: all pointers are valid for the duration of the call.
    let rc = unsafe { libc::getaddrinfo(c_host.as_ptr(), ptr::null(), &hints, &mut head) };
    let list = AddrInfoList { head };
    if rc != 0 {
        return Err(NetError::from_gai(rc, host));
    }

    Ok(list.iter().flatten().collect())
}
