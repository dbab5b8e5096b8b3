use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::{Category, DomainError, GenerationRequest};

const MOCK_MODEL: &str = "mock-chat";

/// Offline [`ChatClient`] for local runs and tests.
///
/// Without a script it answers deterministically from the prompt: the first
/// closed-set category named in the user text (or `Other`) when the prompt
/// asks for a category, otherwise an echo of the message. Scripted replies
/// are consumed in order before falling back to that behavior.
pub struct MockChatClient {
    script: Mutex<VecDeque<Result<String, DomainError>>>,
    calls: AtomicU32,
    call_times: Mutex<Vec<Instant>>,
    configured: bool,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicU32::new(0),
            call_times: Mutex::new(Vec::new()),
            configured: true,
        }
    }

    /// Replies handed out one per call, in order.
    pub fn scripted(replies: Vec<Result<String, DomainError>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            ..Self::new()
        }
    }

    /// A client that behaves as if no API key were set.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Instants at which `complete` was entered.
    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn default_reply(request: &GenerationRequest) -> String {
        let text = request.user_text();
        if text.starts_with("Categorize this complaint") {
            let complaint = text
                .split_once("Complaint:")
                .map(|(_, c)| c.to_lowercase())
                .unwrap_or_default();
            return Category::ALL
                .iter()
                .find(|c| complaint.contains(&c.as_str().to_lowercase()))
                .copied()
                .unwrap_or(Category::Other)
                .as_str()
                .to_string();
        }

        format!("You said: {}", text.trim())
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        self.ensure_configured()?;

        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.call_times
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Instant::now());

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        debug!(call, scripted = scripted.is_some(), "MockChatClient: completing");

        match scripted {
            Some(reply) => reply,
            None => Ok(Self::default_reply(request)),
        }
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.configured {
            Ok(())
        } else {
            Err(DomainError::configuration("API key is missing"))
        }
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }
}
