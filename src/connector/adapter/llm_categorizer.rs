use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::{Categorizer, ChatClient, RetryPolicy};
use crate::domain::{Category, CategoryPolicy, DomainError, GenerationRequest, GenerationResult};

/// A [`Categorizer`] that asks the generative-text provider for a label.
///
/// Falls back gracefully: a missing key, a provider error, a malformed
/// response or a transport failure all produce `Other` instead of an error.
/// Every fallback is logged with its error class and counted, so silent
/// mislabeling stays visible in logs and on the health endpoint.
///
/// Runs with a single attempt unless a different [`RetryPolicy`] is given.
pub struct LlmCategorizer {
    client: Arc<dyn ChatClient>,
    retry_policy: RetryPolicy,
    policy: CategoryPolicy,
    fallbacks: AtomicU64,
}

impl LlmCategorizer {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            retry_policy: RetryPolicy::single_attempt(),
            policy: CategoryPolicy::default(),
            fallbacks: AtomicU64::new(0),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_category_policy(mut self, policy: CategoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of calls that ended in the fallback label because of an error.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn prompt(text: &str) -> String {
        format!(
            "Categorize this complaint into one of the following categories: {}. \
             Respond with only the category.\n\nComplaint:\n{}",
            Category::prompt_list(),
            text
        )
    }

    fn fallback(&self, kind: &str, reason: &str) -> String {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
        warn!(
            kind,
            fallback = Category::Other.as_str(),
            "LlmCategorizer: {reason}. Falling back to default category."
        );
        Category::Other.as_str().to_string()
    }
}

#[async_trait]
impl Categorizer for LlmCategorizer {
    async fn categorize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            debug!("LlmCategorizer: empty complaint text, using default category");
            return Category::Other.as_str().to_string();
        }

        if let Err(e) = self.client.ensure_configured() {
            return self.fallback(e.kind(), &e.to_string());
        }

        let request = match GenerationRequest::new(Self::prompt(text)) {
            Ok(r) => r,
            Err(e) => return self.fallback(e.kind(), &e.to_string()),
        };

        match self
            .retry_policy
            .generate(self.client.as_ref(), &request)
            .await
        {
            GenerationResult::Success { text: raw } => {
                debug!("LlmCategorizer raw response: {raw}");
                if raw.trim().is_empty() {
                    let e = DomainError::terminal("empty candidate text");
                    return self.fallback(e.kind(), &e.to_string());
                }
                self.policy.apply(&raw)
            }
            GenerationResult::Failure { reason, .. } => self.fallback("provider", &reason),
        }
    }
}
