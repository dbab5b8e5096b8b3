use async_trait::async_trait;

use crate::domain::{DomainError, GenerationRequest};

/// An interface for sending a prompt to a generative-text provider and
/// receiving the generated text.
///
/// Implementors encapsulate transport, credentials and vendor-specific
/// payloads. Errors must be classified so the retry policy can tell a
/// transient overload from a terminal failure.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send the request's optional system instruction and user text and
    /// return the raw generated text.
    async fn complete(&self, request: &GenerationRequest) -> Result<String, DomainError>;

    /// Check credentials and settings without touching the network. Callers
    /// run this before dispatching so a misconfigured client fails fast.
    fn ensure_configured(&self) -> Result<(), DomainError> {
        Ok(())
    }

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
