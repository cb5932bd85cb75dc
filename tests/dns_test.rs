//! DNS Module Tests
//!
//! Covers:
//! - `HostnameResolver` address-family preference using a MockResolver
//! - TXT endpoint record parsing
//! - `GaiResolver` (Basic System Resolver)

use peerdns::base::boot::BootContext;
use peerdns::base::neterror::{ErrorKind, NetError};
use peerdns::dns::{
    parse_txt_endpoint, Addrs, BackoffRetrier, HostnameResolver, Name, Resolve, Resolving,
    RetryPolicy,
};

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

struct MockResolver {
    response: Vec<IpAddr>,
}

impl Resolve for MockResolver {
    fn resolve(&self, _name: Name) -> Resolving {
        let addrs = self.response.clone();
        Box::pin(async move { Ok(Box::new(addrs.into_iter()) as Addrs) })
    }
}

fn hostname_resolver(response: Vec<IpAddr>) -> HostnameResolver {
    HostnameResolver::new(
        Arc::new(MockResolver { response }),
        BackoffRetrier::new(RetryPolicy::no_retry(), BootContext::interactive()),
    )
}

#[tokio::test]
async fn test_ipv4_preferred_over_earlier_ipv6() {
    let resolver = hostname_resolver(vec![
        IpAddr::V6(Ipv6Addr::LOCALHOST),
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)),
    ]);

    let addr = resolver.resolve("peer.example").await.unwrap();
    assert_eq!(addr, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
    assert_eq!(addr.to_string(), "10.0.0.1");
}

#[tokio::test]
async fn test_ipv6_only() {
    let first = IpAddr::V6(Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 1));
    let resolver = hostname_resolver(vec![first, IpAddr::V6(Ipv6Addr::LOCALHOST)]);

    let addr = resolver.resolve("peer.example").await.unwrap();
    assert_eq!(addr, first);
    assert_eq!(addr.to_string(), "fd00::1");
}

#[tokio::test]
async fn test_no_addresses() {
    let resolver = hostname_resolver(vec![]);

    let err = resolver.resolve("peer.example").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HostNotFound);
}

#[test]
fn test_txt_record_formats() {
    let target = parse_txt_endpoint("host1:1234||host2:5678").unwrap();
    assert_eq!((target.host.as_str(), target.port), ("host1", 1234));

    let target = parse_txt_endpoint("2001:db8::1:443").unwrap();
    assert_eq!((target.host.as_str(), target.port), ("2001:db8::1", 443));

    let target = parse_txt_endpoint("peer.example").unwrap();
    assert_eq!((target.host.as_str(), target.port), ("peer.example", 0));

    let err = parse_txt_endpoint("peer.example:abc").unwrap_err();
    assert!(matches!(err, NetError::RecordParse { .. }));
}

#[cfg(unix)]
#[tokio::test]
async fn test_gai_resolver_localhost() {
    let resolver = peerdns::dns::GaiResolver::new();
    // localhost should always resolve, usually to 127.0.0.1 or ::1
    let result = resolver.resolve(Name::new("localhost")).await;

    // Depending on system config, this might fail in some CI envs,
    // but usually localhost is standard.
    if let Ok(addrs) = result {
        let list: Vec<_> = addrs.collect();
        assert!(!list.is_empty());
    } else {
        // Soft fail if network unavailable, but log it
        println!("GaiResolver failed for localhost - possibly no network access");
    }
}
