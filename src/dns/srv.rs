//! Service-record endpoint resolution.

use super::{hostname::HostnameResolver, retry::BackoffRetrier, LookupRecords, Name, SrvTarget};
use crate::base::neterror::NetError;
use std::{net::IpAddr, sync::Arc};

/// Outcome of resolving an endpoint through an SRV record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvResolution {
    pub address: IpAddr,
    pub port: u16,
    /// Error from the final SRV lookup, when an earlier lookup had already
    /// produced the target that was used.
    pub lookup_error: Option<NetError>,
}

/// Resolves a service name to an address and port.
///
/// Only the first record is used; priority and weight are ignored.
#[derive(Clone)]
pub struct SrvResolver {
    records: Arc<dyn LookupRecords>,
    hostname: HostnameResolver,
    retrier: BackoffRetrier,
}

impl SrvResolver {
    pub fn new(
        records: Arc<dyn LookupRecords>,
        hostname: HostnameResolver,
        retrier: BackoffRetrier,
    ) -> Self {
        Self {
            records,
            hostname,
            retrier,
        }
    }

    pub async fn resolve(&self, name: &str) -> Result<SrvResolution, NetError> {
        let mut found: Option<SrvTarget> = None;

        let last = self
            .retrier
            .run(
                name,
                || self.resolve_once(name),
                |result| {
                    if let Ok(Some(target)) = result {
                        if !target.target.is_empty() {
                            found = Some(target.clone());
                        }
                    }
                    self.retrier.record_verdict(result, |first| {
                        first
                            .as_ref()
                            .is_some_and(|t| !t.target.is_empty() && t.port != 0)
                    })
                },
            )
            .await;

        let lookup_error = match last {
            Err(NetError::Cancelled) => return Err(NetError::Cancelled),
            Err(err) => Some(err),
            Ok(_) => None,
        };

        let target = match found {
            Some(target) => target,
            None => {
                return Err(lookup_error.unwrap_or_else(|| NetError::host_not_found(name)));
            }
        };

        if let Some(err) = &lookup_error {
            tracing::warn!(domain = %name, error = %err, target = %target.target, "using earlier SRV answer");
        }
        tracing::debug!(domain = %name, target = %target.target, port = target.port, "SRV record resolved");

        let address = self.hostname.resolve(&target.target).await?;
        Ok(SrvResolution {
            address,
            port: target.port,
            lookup_error,
        })
    }

    async fn resolve_once(&self, name: &str) -> Result<Option<SrvTarget>, NetError> {
        let records = self.records.lookup_srv(Name::new(name)).await?;
        Ok(records.into_iter().next())
    }
}

impl std::fmt::Debug for SrvResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SrvResolver")
            .field("hostname", &self.hostname)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::boot::BootContext;
    use crate::dns::{retry::RetryPolicy, Addrs, Resolve, Resolving, SrvLookup, TxtLookup};
    use std::collections::VecDeque;
    use std::net::Ipv4Addr;
    use std::sync::Mutex;

    /// Replays scripted SRV answers; the last one repeats.
    struct ScriptedRecords {
        answers: Mutex<VecDeque<Result<Vec<SrvTarget>, NetError>>>,
    }

    impl ScriptedRecords {
        fn new(answers: Vec<Result<Vec<SrvTarget>, NetError>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
            })
        }
    }

    impl LookupRecords for ScriptedRecords {
        fn lookup_srv(&self, _name: Name) -> SrvLookup {
            let mut answers = self.answers.lock().unwrap();
            let answer = if answers.len() > 1 {
                answers.pop_front().unwrap()
            } else {
                answers.front().cloned().unwrap()
            };
            Box::pin(async move { answer })
        }

        fn lookup_txt(&self, name: Name) -> TxtLookup {
            Box::pin(async move { Err(NetError::host_not_found(name.as_str())) })
        }
    }

    struct StaticHosts;

    impl Resolve for StaticHosts {
        fn resolve(&self, name: Name) -> Resolving {
            Box::pin(async move {
                match name.as_str() {
                    "wg1.example" => {
                        Ok(Box::new([IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10))].into_iter()) as Addrs)
                    }
                    "wg2.example" => {
                        Ok(Box::new([IpAddr::V4(Ipv4Addr::new(192, 0, 2, 20))].into_iter()) as Addrs)
                    }
                    other => Err(NetError::host_not_found(other)),
                }
            })
        }
    }

    fn resolver(records: Arc<ScriptedRecords>) -> SrvResolver {
        let retrier = BackoffRetrier::new(RetryPolicy::default(), BootContext::interactive());
        SrvResolver::new(
            records,
            HostnameResolver::new(Arc::new(StaticHosts), retrier.clone()),
            retrier,
        )
    }

    fn lookup_failed() -> NetError {
        NetError::Lookup {
            domain: "_wg._udp.example".into(),
            message: "SERVFAIL".into(),
        }
    }

    #[tokio::test]
    async fn test_first_record_wins() {
        let records = ScriptedRecords::new(vec![Ok(vec![
            SrvTarget::new("wg2.example", 51821),
            SrvTarget::new("wg1.example", 51820),
        ])]);

        let resolved = resolver(records).resolve("_wg._udp.example").await.unwrap();
        assert_eq!(resolved.address, IpAddr::V4(Ipv4Addr::new(192, 0, 2, 20)));
        assert_eq!(resolved.port, 51821);
        assert_eq!(resolved.lookup_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_error_is_retried() {
        let records = ScriptedRecords::new(vec![
            Err(lookup_failed()),
            Err(lookup_failed()),
            Ok(vec![SrvTarget::new("wg1.example", 51820)]),
        ]);

        let resolved = resolver(records).resolve("_wg._udp.example").await.unwrap();
        assert_eq!(resolved.port, 51820);
        assert_eq!(resolved.lookup_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_target_kept_after_later_failures() {
        let records = ScriptedRecords::new(vec![
            Ok(vec![SrvTarget::new("wg1.example", 0)]),
            Err(lookup_failed()),
        ]);

        let resolved = resolver(records).resolve("_wg._udp.example").await.unwrap();
        assert_eq!(resolved.address, IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10)));
        assert_eq!(resolved.port, 0);
        assert_eq!(resolved.lookup_error, Some(lookup_failed()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_target_returns_lookup_error() {
        let records = ScriptedRecords::new(vec![Err(lookup_failed())]);

        let result = resolver(records).resolve("_wg._udp.example").await;
        assert_eq!(result, Err(lookup_failed()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_answer_is_host_not_found() {
        let records = ScriptedRecords::new(vec![Ok(vec![])]);

        let result = resolver(records).resolve("_wg._udp.example").await;
        assert_eq!(result, Err(NetError::host_not_found("_wg._udp.example")));
    }

    #[tokio::test]
    async fn test_hostname_error_is_authoritative() {
        let records = ScriptedRecords::new(vec![Ok(vec![SrvTarget::new("gone.example", 51820)])]);

        let result = resolver(records).resolve("_wg._udp.example").await;
        assert_eq!(result, Err(NetError::host_not_found("gone.example")));
    }
}
