use std::sync::Arc;

use tracing::{info, warn};

use crate::application::{ChatClient, RetryPolicy};
use crate::domain::{DomainError, GenerationRequest, GenerationResult};

/// Persona instruction sent ahead of every chat message.
pub const CHAT_SYSTEM_PROMPT: &str = "\
You're a helpful chatbot for CampusFix.
If a student talks about issues like ragging, harassment, or emotional stress, be empathetic, \
build trust, and guide them step-by-step.
Once you collect enough information like category, title, description, room (if applicable), ask:
\"Would you like me to submit this complaint for you, or would you prefer to go to the full complaint form?\"
Then show options to the user.
Be supportive and kind.";

/// Forwards one user message plus the fixed persona prompt to the provider.
///
/// Validation and configuration problems come back as `Err` before any
/// provider call. Provider failures come back as `Ok(GenerationResult::Failure)`
/// once the retry policy has given up.
pub struct ChatRelayUseCase {
    client: Arc<dyn ChatClient>,
    retry_policy: RetryPolicy,
}

impl ChatRelayUseCase {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self {
            client,
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub async fn execute(&self, message: &str) -> Result<GenerationResult, DomainError> {
        let request = GenerationRequest::new(message)?.with_system_prompt(CHAT_SYSTEM_PROMPT);
        self.client.ensure_configured()?;

        info!(
            model = self.client.model_name(),
            chars = request.user_text().len(),
            "Relaying chat message"
        );

        let result = match self
            .retry_policy
            .generate(self.client.as_ref(), &request)
            .await
        {
            GenerationResult::Success { text } => {
                let reply = text.trim();
                if reply.is_empty() {
                    GenerationResult::terminal(&DomainError::terminal(
                        "Provider returned an empty reply",
                    ))
                } else {
                    GenerationResult::success(reply)
                }
            }
            failure => failure,
        };

        if let Some(reason) = result.reason() {
            warn!("Chat relay failed: {}", reason);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::connector::MockChatClient;

    #[tokio::test]
    async fn empty_message_never_reaches_provider() {
        let client = Arc::new(MockChatClient::new());
        let relay = ChatRelayUseCase::new(client.clone());

        let err = relay.execute("  \t").await.unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn missing_key_is_reported_before_dispatch() {
        let client = Arc::new(MockChatClient::unconfigured());
        let relay = ChatRelayUseCase::new(client.clone());

        let err = relay.execute("hello").await.unwrap_err();

        assert!(err.is_configuration());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn reply_is_trimmed() {
        let client = Arc::new(MockChatClient::scripted(vec![Ok("  Hi there!\n".to_string())]));
        let relay = ChatRelayUseCase::new(client);

        let result = relay.execute("hello").await.unwrap();

        assert_eq!(result, GenerationResult::success("Hi there!"));
    }

    #[tokio::test]
    async fn blank_reply_is_a_failure() {
        let client = Arc::new(MockChatClient::scripted(vec![Ok(" \n ".to_string())]));
        let relay = ChatRelayUseCase::new(client);

        let result = relay.execute("hello").await.unwrap();

        assert!(!result.is_success());
        assert!(result.reason().unwrap().contains("empty reply"));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_until_success() {
        let client = Arc::new(MockChatClient::scripted(vec![
            Err(DomainError::transient("503 Service Unavailable")),
            Err(DomainError::transient("503 Service Unavailable")),
            Ok("Recovered".to_string()),
        ]));
        let relay = ChatRelayUseCase::new(client.clone());

        let result = relay.execute("hello").await.unwrap();

        assert_eq!(result.text(), Some("Recovered"));
        assert_eq!(client.calls(), 3);
        let times = client.call_times();
        assert!(times[1] - times[0] >= Duration::from_secs(2));
        assert!(times[2] - times[1] >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_failure_is_not_retried() {
        let client = Arc::new(MockChatClient::scripted(vec![Err(DomainError::terminal(
            "[400] API key not valid",
        ))]));
        let relay = ChatRelayUseCase::new(client.clone());

        let result = relay.execute("hello").await.unwrap();

        assert_eq!(
            result,
            GenerationResult::Failure {
                reason: "Provider error: [400] API key not valid".to_string(),
                retryable: false
            }
        );
        assert_eq!(client.calls(), 1);
    }
}
