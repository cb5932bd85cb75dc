//! Process start-up context shared by the resolvers.
//!
//! Whether the process was launched by the OS at boot changes how patient the
//! resolvers are: DNS and routing may still be coming up, so the retry budget
//! grows and "host not found" while offline is treated as transient.

use std::{fmt, sync::Arc};
use tokio::sync::watch;

/// Reports whether the machine currently appears to have Internet access.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

impl<F> Connectivity for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_online(&self) -> bool {
        self()
    }
}

/// Connectivity source that always reports an online machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeOnline;

impl Connectivity for AssumeOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Boot-time facts threaded into every resolver at construction.
#[derive(Clone)]
pub struct BootContext {
    started_at_boot: bool,
    connectivity: Arc<dyn Connectivity>,
}

impl BootContext {
    pub fn new(started_at_boot: bool, connectivity: Arc<dyn Connectivity>) -> Self {
        Self {
            started_at_boot,
            connectivity,
        }
    }

    /// Context for a process started by a user or another service.
    pub fn interactive() -> Self {
        Self::new(false, Arc::new(AssumeOnline))
    }

    /// Context for a process the OS launched at boot.
    pub fn at_boot(connectivity: impl Connectivity + 'static) -> Self {
        Self::new(true, Arc::new(connectivity))
    }

    pub fn started_at_boot(&self) -> bool {
        self.started_at_boot
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }
}

impl Default for BootContext {
    fn default() -> Self {
        Self::interactive()
    }
}

impl fmt::Debug for BootContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootContext")
            .field("started_at_boot", &self.started_at_boot)
            .finish_non_exhaustive()
    }
}

/// Cancellation handle for in-progress resolution.
///
/// Triggering it aborts any pending lookup or backoff sleep in resolvers
/// holding one of its listeners.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a [`Shutdown`].
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once shutdown has been triggered.
    ///
    /// If the [`Shutdown`] is dropped without triggering, this never completes.
    pub async fn triggered(&mut self) {
        let closed = self.rx.wait_for(|stop| *stop).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_interactive_context() {
        let ctx = BootContext::interactive();
        assert!(!ctx.started_at_boot());
        assert!(ctx.is_online());
    }

    #[test]
    fn test_closure_connectivity() {
        let online = Arc::new(AtomicBool::new(false));
        let flag = online.clone();
        let ctx = BootContext::at_boot(move || flag.load(Ordering::SeqCst));

        assert!(ctx.started_at_boot());
        assert!(!ctx.is_online());
        online.store(true, Ordering::SeqCst);
        assert!(ctx.is_online());
    }

    #[tokio::test]
    async fn test_shutdown_listener() {
        let shutdown = Shutdown::new();
        let mut listener = shutdown.listener();
        assert!(!listener.is_triggered());

        shutdown.trigger();
        listener.triggered().await;
        assert!(listener.is_triggered());
    }
}
