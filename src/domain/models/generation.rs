use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// One prompt sent to the generative-text provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    system_prompt: Option<String>,
    user_text: String,
}

impl GenerationRequest {
    /// Build a request, rejecting empty or whitespace-only user text so it
    /// never reaches the network.
    pub fn new(user_text: impl Into<String>) -> Result<Self, DomainError> {
        let user_text = user_text.into();
        if user_text.trim().is_empty() {
            return Err(DomainError::invalid_input("No input provided"));
        }

        Ok(Self {
            system_prompt: None,
            user_text,
        })
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.system_prompt = if prompt.trim().is_empty() {
            None
        } else {
            Some(prompt)
        };
        self
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }
}

/// Outcome of a generation call after the retry policy has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GenerationResult {
    Success { text: String },
    Failure { reason: String, retryable: bool },
}

impl GenerationResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }

    /// Final outcome once the attempt budget is spent: any failure is terminal
    /// from the caller's point of view.
    pub fn terminal(err: &DomainError) -> Self {
        Self::Failure {
            reason: err.to_string(),
            retryable: false,
        }
    }
}
