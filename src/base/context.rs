//! Ergonomic error context helpers.
//!
//! Provides extension traits for turning resolver-library errors into
//! context-rich `NetError` variants.

use crate::base::neterror::NetError;
use hickory_resolver::{proto::ProtoErrorKind, ResolveError};

/// Extension trait for adding context to hickory lookup Results.
pub trait LookupResultExt<T> {
    /// Map an SRV/TXT lookup failure to [`NetError::Lookup`].
    ///
    /// # Example
    /// ```ignore
    /// use peerdns::base::context::LookupResultExt;
    ///
    /// let records = resolver.srv_lookup(name).await.lookup_context(name)?;
    /// // Error: "Record lookup for _wg._udp.example.com failed: no record found ..."
    /// ```
    fn lookup_context(self, domain: &str) -> Result<T, NetError>;

    /// Classify an address lookup failure.
    ///
    /// NXDOMAIN and empty answers become [`NetError::HostNotFound`];
    /// timeouts and unreachable name servers become [`NetError::TryAgain`].
    fn host_context(self, domain: &str) -> Result<T, NetError>;
}

impl<T> LookupResultExt<T> for Result<T, ResolveError> {
    fn lookup_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::Lookup {
            domain: domain.to_string(),
            message: e.to_string(),
        })
    }

    fn host_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| classify_host_error(&e, domain))
    }
}

fn classify_host_error(e: &ResolveError, domain: &str) -> NetError {
    if e.is_nx_domain() || e.is_no_records_found() {
        return NetError::host_not_found(domain);
    }
    if let Some(proto) = e.proto() {
        if proto.is_no_connections()
            || matches!(proto.kind(), ProtoErrorKind::Timeout | ProtoErrorKind::Busy)
        {
            return NetError::try_again(domain);
        }
    }
    NetError::Other {
        domain: domain.to_string(),
        message: e.to_string(),
    }
}

#[cfg(unix)]
impl NetError {
    /// Classify a non-zero `getaddrinfo` return code.
    pub fn from_gai(code: libc::c_int, domain: &str) -> Self {
        match code {
            libc::EAI_AGAIN => NetError::try_again(domain),
            libc::EAI_NONAME => NetError::host_not_found(domain),
            #[cfg(any(all(target_os = "linux", target_env = "gnu"), target_os = "macos"))]
            libc::EAI_NODATA => NetError::host_not_found(domain),
            libc::EAI_SYSTEM => NetError::Other {
                domain: domain.to_string(),
                message: std::io::Error::last_os_error().to_string(),
            },
            _ => NetError::Other {
                domain: domain.to_string(),
                message: gai_message(code),
            },
        }
    }
}

#[cfg(unix)]
fn gai_message(code: libc::c_int) -> String {
    // SAFETY: gai_strerror returns a pointer to a static NUL-terminated string.
    let msg = unsafe { std::ffi::CStr::from_ptr(libc::gai_strerror(code)) };
    msg.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::neterror::ErrorKind;
    use hickory_resolver::proto::{
        op::{Query, ResponseCode},
        ProtoError,
    };

    #[cfg(unix)]
    #[test]
    fn test_gai_try_again() {
        let err = NetError::from_gai(libc::EAI_AGAIN, "example.com");
        assert_eq!(err, NetError::try_again("example.com"));
        assert!(err.is_transient());
    }

    #[cfg(unix)]
    #[test]
    fn test_gai_no_name() {
        let err = NetError::from_gai(libc::EAI_NONAME, "nope.invalid");
        match err {
            NetError::HostNotFound { domain } => assert_eq!(domain, "nope.invalid"),
            _ => panic!("Expected HostNotFound"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_gai_other_carries_message() {
        let err = NetError::from_gai(libc::EAI_FAIL, "example.com");
        assert_eq!(err.kind(), ErrorKind::TerminalOther);
        match err {
            NetError::Other { message, .. } => assert!(!message.is_empty()),
            _ => panic!("Expected Other"),
        }
    }

    #[test]
    fn test_lookup_context() {
        let result: Result<(), ResolveError> = Err(ResolveError::from("no answer"));
        let err = result.lookup_context("_wg._udp.example.com").unwrap_err();

        match err {
            NetError::Lookup { domain, message } => {
                assert_eq!(domain, "_wg._udp.example.com");
                assert!(message.contains("no answer"));
            }
            _ => panic!("Expected Lookup"),
        }
    }

    fn proto_failure(kind: ProtoErrorKind) -> Result<(), ResolveError> {
        Err(ResolveError::from(ProtoError::from(kind)))
    }

    fn empty_answer(response_code: ResponseCode) -> Result<(), ResolveError> {
        let err = ProtoError::nx_error(
            Box::new(Query::new()),
            None,
            None,
            None,
            response_code,
            true,
            None,
        );
        Err(ResolveError::from(err))
    }

    #[test]
    fn test_host_context_timeout_is_transient() {
        let err = proto_failure(ProtoErrorKind::Timeout)
            .host_context("example.com")
            .unwrap_err();
        assert_eq!(err, NetError::try_again("example.com"));
    }

    #[test]
    fn test_host_context_busy_is_transient() {
        let err = proto_failure(ProtoErrorKind::Busy)
            .host_context("example.com")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransientDns);
    }

    #[test]
    fn test_host_context_no_connections_is_transient() {
        let err = proto_failure(ProtoErrorKind::NoConnections)
            .host_context("example.com")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransientDns);
    }

    #[test]
    fn test_host_context_nxdomain_is_not_found() {
        let err = empty_answer(ResponseCode::NXDomain)
            .host_context("nope.invalid")
            .unwrap_err();
        assert_eq!(err, NetError::host_not_found("nope.invalid"));
    }

    #[test]
    fn test_host_context_no_records_is_not_found() {
        let err = empty_answer(ResponseCode::NoError)
            .host_context("v6only.example")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HostNotFound);
    }

    #[test]
    fn test_host_context_generic_failure_is_terminal() {
        let result: Result<(), ResolveError> = Err(ResolveError::from("resolver broke"));
        let err = result.host_context("example.com").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TerminalOther);
    }
}
