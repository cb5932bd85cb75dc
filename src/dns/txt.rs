//! Text-record endpoint resolution.
//!
//! The first TXT record of a name holds `host:port`, optionally followed by
//! `||` and alternates which are ignored. The split happens at the last `:`,
//! so a bare IPv6 address followed by `:port` works without brackets.

use super::{retry::BackoffRetrier, LookupRecords, Name};
use crate::base::neterror::NetError;
use std::sync::Arc;

const ALTERNATE_SEPARATOR: &str = "||";

/// Host and port carried by a TXT record. Both may be empty or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxtTarget {
    pub host: String,
    pub port: u16,
}

impl TxtTarget {
    fn is_complete(&self) -> bool {
        !self.host.is_empty() && self.port != 0
    }
}

/// Parses one TXT record into a target.
///
/// A record without `:` yields the whole trimmed text as host and port 0.
pub fn parse_txt_endpoint(record: &str) -> Result<TxtTarget, NetError> {
    let candidate = match record.split_once(ALTERNATE_SEPARATOR) {
        Some((first, _)) => first,
        None => record,
    }
    .trim();

    let Some((host, port)) = candidate.rsplit_once(':') else {
        return Ok(TxtTarget {
            host: candidate.to_string(),
            port: 0,
        });
    };

    let port = port
        .trim()
        .parse::<u16>()
        .map_err(|e| NetError::RecordParse {
            record: record.to_string(),
            reason: e.to_string(),
        })?;

    Ok(TxtTarget {
        host: host.trim().to_string(),
        port,
    })
}

/// Resolves a name to the target encoded in its first TXT record.
///
/// The host is returned as written in the record; it is not resolved further.
#[derive(Clone)]
pub struct TxtResolver {
    records: Arc<dyn LookupRecords>,
    retrier: BackoffRetrier,
}

impl TxtResolver {
    pub fn new(records: Arc<dyn LookupRecords>, retrier: BackoffRetrier) -> Self {
        Self { records, retrier }
    }

    /// Retries until a record yields both host and port, or the budget runs
    /// out; then the last attempt's outcome is returned.
    pub async fn resolve(&self, name: &str) -> Result<TxtTarget, NetError> {
        let target = self
            .retrier
            .run(
                name,
                || self.resolve_once(name),
                |result| self.retrier.record_verdict(result, TxtTarget::is_complete),
            )
            .await?;

        tracing::debug!(domain = %name, host = %target.host, port = target.port, "TXT record resolved");
        Ok(target)
    }

    async fn resolve_once(&self, name: &str) -> Result<TxtTarget, NetError> {
        let records = self.records.lookup_txt(Name::new(name)).await?;
        match records.first() {
            Some(record) => parse_txt_endpoint(record),
            None => Ok(TxtTarget::default()),
        }
    }
}

impl std::fmt::Debug for TxtResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxtResolver")
            .field("retrier", &self.retrier)
            .finish_non_exhaustive()
    }
}
