use thiserror::Error;

/// Errors produced while resolving peer endpoints.
///
/// Resolvers hand these back unchanged; nothing between a resolver and the
/// caller of [`crate::conf::EndpointResolver::resolve_endpoints`] wraps or
/// translates them.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    #[error("Temporary DNS failure resolving {domain}")]
    TryAgain { domain: String },
    #[error("Host not found: {domain}")]
    HostNotFound { domain: String },
    #[error("Malformed endpoint record {record:?}: {reason}")]
    RecordParse { record: String, reason: String },
    #[error("Record lookup for {domain} failed: {message}")]
    Lookup { domain: String, message: String },
    #[error("Resolving {domain} failed: {message}")]
    Other { domain: String, message: String },
    #[error("Invalid host name {domain:?}")]
    InvalidName { domain: String },
    #[error("Resolution cancelled")]
    Cancelled,
}

/// Coarse classification of a [`NetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The resolver asked us to try again later.
    TransientDns,
    HostNotFound,
    /// A TXT endpoint record carried an unparseable port.
    RecordParse,
    /// SRV or TXT query failure.
    Lookup,
    TerminalOther,
    Cancelled,
}

impl NetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetError::TryAgain { .. } => ErrorKind::TransientDns,
            NetError::HostNotFound { .. } => ErrorKind::HostNotFound,
            NetError::RecordParse { .. } => ErrorKind::RecordParse,
            NetError::Lookup { .. } => ErrorKind::Lookup,
            NetError::Other { .. } | NetError::InvalidName { .. } => ErrorKind::TerminalOther,
            NetError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Chromium `net_error_list.h` code closest to this error.
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::HostNotFound { .. } => -105,
            NetError::InvalidName { .. } => -108,
            NetError::Lookup { .. } | NetError::Other { .. } => -137,
            NetError::TryAgain { .. } => -139,
            NetError::RecordParse { .. } => -320,
            NetError::Cancelled => -3,
        }
    }

    pub fn host_not_found(domain: impl Into<String>) -> Self {
        NetError::HostNotFound {
            domain: domain.into(),
        }
    }

    pub fn try_again(domain: impl Into<String>) -> Self {
        NetError::TryAgain {
            domain: domain.into(),
        }
    }

    /// Returns true for the "try again" condition reported by the resolver.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::TransientDns
    }

    pub fn is_host_not_found(&self) -> bool {
        self.kind() == ErrorKind::HostNotFound
    }
}
