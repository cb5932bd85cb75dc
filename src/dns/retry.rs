//! Fixed-interval retry for lookups that may fail while the network comes up.
//!
//! Every resolver wraps its single-shot lookup in a [`BackoffRetrier`]. The
//! first attempt runs immediately; each further attempt waits one
//! [`RetryPolicy::interval`]. A process started at boot gets
//! [`RetryPolicy::boot_multiplier`] times the normal budget.

use crate::base::{
    boot::{BootContext, ShutdownListener},
    neterror::NetError,
};
use std::{future::Future, time::Duration};

/// Whether a finished attempt ends the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Done,
    Retry,
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts made by a process not started at boot (default: 10)
    pub max_attempts: usize,
    /// Budget multiplier applied when started at boot (default: 4)
    pub boot_multiplier: usize,
    /// Sleep between attempts (default: 4s)
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            boot_multiplier: 4,
            interval: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, even at boot.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            boot_multiplier: 1,
            ..Default::default()
        }
    }

    /// Total attempts allowed for the given context. Never less than one.
    pub fn budget(&self, boot: &BootContext) -> usize {
        let attempts = if boot.started_at_boot() {
            self.max_attempts.saturating_mul(self.boot_multiplier)
        } else {
            self.max_attempts
        };
        attempts.max(1)
    }
}

/// Runs an attempt function until its verdict says done or the budget runs out.
#[derive(Debug, Clone, Default)]
pub struct BackoffRetrier {
    policy: RetryPolicy,
    boot: BootContext,
    shutdown: Option<ShutdownListener>,
}

impl BackoffRetrier {
    pub fn new(policy: RetryPolicy, boot: BootContext) -> Self {
        Self {
            policy,
            boot,
            shutdown: None,
        }
    }

    /// Abort pending attempts and sleeps with [`NetError::Cancelled`] once
    /// `listener` fires.
    pub fn with_shutdown(mut self, listener: ShutdownListener) -> Self {
        self.shutdown = Some(listener);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn boot(&self) -> &BootContext {
        &self.boot
    }

    /// Runs `attempt` until `verdict` returns [`Verdict::Done`].
    ///
    /// When the budget is exhausted the last attempt's result is returned
    /// unchanged, error or not.
    pub async fn run<T, F, Fut, V>(
        &self,
        domain: &str,
        mut attempt: F,
        mut verdict: V,
    ) -> Result<T, NetError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NetError>>,
        V: FnMut(&Result<T, NetError>) -> Verdict,
    {
        let budget = self.policy.budget(&self.boot);
        let mut shutdown = self.shutdown.clone();
        let mut attempts = 0;

        loop {
            let result = cancellable(&mut shutdown, attempt()).await?;
            attempts += 1;

            if verdict(&result) == Verdict::Done {
                return result;
            }
            if attempts >= budget {
                tracing::warn!(domain = %domain, attempts, "giving up after exhausting retry budget");
                return result;
            }

            tracing::debug!(
                domain = %domain,
                attempt = attempts,
                budget,
                delay_ms = self.policy.interval.as_millis() as u64,
                "retrying lookup"
            );
            cancellable(&mut shutdown, tokio::time::sleep(self.policy.interval)).await?;
        }
    }

    /// Retry decision for address lookups.
    ///
    /// "Try again" is always retried. "Host not found" is retried only for a
    /// boot-started process whose machine looks offline. Everything else is
    /// final.
    pub fn hostname_verdict<T>(&self, domain: &str, result: &Result<T, NetError>) -> Verdict {
        let err = match result {
            Ok(_) => return Verdict::Done,
            Err(err) => err,
        };

        if err.is_transient() {
            tracing::info!(
                domain = %domain,
                "Temporary DNS error when resolving, sleeping for {}s",
                self.policy.interval.as_secs()
            );
            return Verdict::Retry;
        }

        if err.is_host_not_found() && self.boot.started_at_boot() && !self.boot.is_online() {
            tracing::info!(
                domain = %domain,
                "Host not found and no Internet connection available, sleeping for {}s",
                self.policy.interval.as_secs()
            );
            return Verdict::Retry;
        }

        Verdict::Done
    }

    /// Retry decision for SRV/TXT lookups: any error or an incomplete answer
    /// is retried.
    pub fn record_verdict<T>(
        &self,
        result: &Result<T, NetError>,
        complete: impl Fn(&T) -> bool,
    ) -> Verdict {
        match result {
            Ok(value) if complete(value) => Verdict::Done,
            _ => Verdict::Retry,
        }
    }
}

/// Races `fut` against the shutdown listener, if any.
async fn cancellable<F: Future>(
    shutdown: &mut Option<ShutdownListener>,
    fut: F,
) -> Result<F::Output, NetError> {
    match shutdown {
        None => Ok(fut.await),
        Some(listener) => {
            if listener.is_triggered() {
                return Err(NetError::Cancelled);
            }
            tokio::select! {
                biased;
                _ = listener.triggered() => Err(NetError::Cancelled),
                out = fut => Ok(out),
            }
        }
    }
}
