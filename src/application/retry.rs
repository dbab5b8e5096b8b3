//! Bounded retry with a fixed backoff, shared by the chat relay and the
//! categorizer.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{DomainError, GenerationRequest, GenerationResult};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(2);

/// Attempt ceiling plus a constant wait between attempts. The delay never
/// grows and is never jittered; only retryable errors (transient overload)
/// are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            // Always make at least one attempt
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// One attempt, no waiting.
    pub fn single_attempt() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt budget is spent. The last error is returned as-is.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, DomainError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt, max_attempts = self.max_attempts, "Dispatching attempt");

            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    warn!(attempt, kind = err.kind(), "Attempt {} failed: {}", attempt, err);

                    if !err.is_retryable() {
                        return Err(err);
                    }

                    if attempt >= self.max_attempts {
                        warn!(attempt, "All retry attempts exhausted");
                        return Err(err);
                    }

                    debug!(backoff_ms = self.backoff.as_millis() as u64, "Backing off");
                    sleep(self.backoff).await;
                }
            }
        }
    }

    /// Send `request` through `client` under this policy and fold the outcome
    /// into a [`GenerationResult`]. Failures are terminal once the policy has
    /// given up.
    pub async fn generate(
        &self,
        client: &dyn ChatClient,
        request: &GenerationRequest,
    ) -> GenerationResult {
        match self.run(|_| client.complete(request)).await {
            Ok(text) => GenerationResult::success(text),
            Err(err) => GenerationResult::terminal(&err),
        }
    }
}
