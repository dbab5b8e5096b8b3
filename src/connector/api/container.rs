use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, warn};

use crate::application::{
    ChatClient, ChatRelayUseCase, ComplaintRepository, RetryPolicy, SubmitComplaintUseCase,
    TriageComplaintsUseCase, UpdateComplaintStatusUseCase, DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_TRIAGE_CONCURRENCY,
};
use crate::connector::relay::{CorsPolicy, RelayState};
use crate::connector::{
    GeminiClient, InMemoryComplaintRepository, JsonFileComplaintRepository, LlmCategorizer,
    MockChatClient, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use crate::domain::CategoryPolicy;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Everything the process needs, gathered once at startup and passed
/// explicitly to the [`Container`].
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Use the offline mock instead of calling the provider.
    pub mock_llm: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Browser origins allowed to call the relay.
    pub allowed_origins: Vec<String>,
    pub category_policy: CategoryPolicy,
    pub chat_retry: RetryPolicy,
    /// Single attempt unless overridden.
    pub categorize_retry: RetryPolicy,
    /// Categorizer calls allowed in flight during triage.
    pub triage_concurrency: usize,
    /// JSON file holding complaints; in-memory when absent.
    pub complaints_file: Option<PathBuf>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            mock_llm: false,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            category_policy: CategoryPolicy::ClosedSet,
            chat_retry: RetryPolicy::default(),
            categorize_retry: RetryPolicy::single_attempt().with_backoff(DEFAULT_BACKOFF),
            triage_concurrency: DEFAULT_TRIAGE_CONCURRENCY,
            complaints_file: None,
        }
    }
}

impl ContainerConfig {
    /// Read configuration from the environment:
    ///
    /// | Variable                        | Default                  |
    /// |---------------------------------|--------------------------|
    /// | `GEMINI_API_KEY`                | none                     |
    /// | `GEMINI_MODEL`                  | `gemini-2.5-pro`         |
    /// | `GEMINI_BASE_URL`               | Google endpoint          |
    /// | `CAMPUSFIX_ALLOWED_ORIGINS`     | `http://localhost:5173`  |
    /// | `CAMPUSFIX_CATEGORY_MODE`       | `closed`                 |
    /// | `CAMPUSFIX_CHAT_ATTEMPTS`       | `3`                      |
    /// | `CAMPUSFIX_CATEGORIZE_ATTEMPTS` | `1`                      |
    /// | `CAMPUSFIX_RETRY_BACKOFF_MS`    | `2000`                   |
    /// | `CAMPUSFIX_TRIAGE_CONCURRENCY`  | `4`                      |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let backoff = parse_var(&lookup, "CAMPUSFIX_RETRY_BACKOFF_MS")
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_BACKOFF);
        let chat_attempts =
            parse_var(&lookup, "CAMPUSFIX_CHAT_ATTEMPTS").unwrap_or(DEFAULT_MAX_ATTEMPTS as u64);
        let categorize_attempts = parse_var(&lookup, "CAMPUSFIX_CATEGORIZE_ATTEMPTS").unwrap_or(1);
        let triage_concurrency = parse_var(&lookup, "CAMPUSFIX_TRIAGE_CONCURRENCY")
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_TRIAGE_CONCURRENCY);

        let allowed_origins = lookup("CAMPUSFIX_ALLOWED_ORIGINS")
            .map(|list| CorsPolicy::from_list(&list).allowed_origins().to_vec())
            .unwrap_or(defaults.allowed_origins);

        Self {
            mock_llm: false,
            api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            model: lookup("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            allowed_origins,
            category_policy: lookup("CAMPUSFIX_CATEGORY_MODE")
                .map(|m| CategoryPolicy::parse(&m))
                .unwrap_or_default(),
            chat_retry: RetryPolicy::new(chat_attempts as u32, backoff),
            categorize_retry: RetryPolicy::new(categorize_attempts as u32, backoff),
            triage_concurrency,
            complaints_file: None,
        }
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a non-negative integer", key, raw);
            None
        }
    }
}

pub struct Container {
    chat_client: Arc<dyn ChatClient>,
    categorizer: Arc<LlmCategorizer>,
    chat_relay: Arc<ChatRelayUseCase>,
    complaint_repo: Arc<dyn ComplaintRepository>,
    config: ContainerConfig,
}

impl Container {
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        let chat_client: Arc<dyn ChatClient> = if config.mock_llm {
            debug!("Using mock chat client");
            Arc::new(MockChatClient::new())
        } else {
            let client = GeminiClient::new(
                config.api_key.clone(),
                config.model.clone(),
                config.base_url.clone(),
            );
            if !client.has_api_key() {
                warn!("GEMINI_API_KEY is not set: chat will fail and categorization will fall back to \"Other\"");
            }
            Arc::new(client)
        };

        let categorizer = Arc::new(
            LlmCategorizer::new(chat_client.clone())
                .with_retry_policy(config.categorize_retry)
                .with_category_policy(config.category_policy),
        );

        let chat_relay = Arc::new(
            ChatRelayUseCase::new(chat_client.clone()).with_retry_policy(config.chat_retry),
        );

        let complaint_repo: Arc<dyn ComplaintRepository> = match config.complaints_file.as_ref() {
            Some(path) => {
                debug!("Using complaint file at {}", path.display());
                Arc::new(JsonFileComplaintRepository::open(path).await?)
            }
            None => {
                debug!("Using in-memory complaint storage");
                Arc::new(InMemoryComplaintRepository::new())
            }
        };

        Ok(Self {
            chat_client,
            categorizer,
            chat_relay,
            complaint_repo,
            config,
        })
    }

    pub fn chat_relay_use_case(&self) -> Arc<ChatRelayUseCase> {
        self.chat_relay.clone()
    }

    pub fn categorizer(&self) -> Arc<LlmCategorizer> {
        self.categorizer.clone()
    }

    pub fn triage_use_case(&self) -> TriageComplaintsUseCase {
        TriageComplaintsUseCase::new(self.complaint_repo.clone(), self.categorizer.clone())
            .with_concurrency(self.config.triage_concurrency)
    }

    pub fn update_status_use_case(&self) -> UpdateComplaintStatusUseCase {
        UpdateComplaintStatusUseCase::new(self.complaint_repo.clone())
    }

    pub fn submit_use_case(&self) -> SubmitComplaintUseCase {
        SubmitComplaintUseCase::new(self.complaint_repo.clone())
    }

    pub fn relay_state(&self) -> RelayState {
        RelayState {
            chat: self.chat_relay.clone(),
            categorizer: self.categorizer.clone(),
            cors: Arc::new(CorsPolicy::new(&self.config.allowed_origins)),
            model: self.chat_client.model_name().to_string(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.chat_client.model_name()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = ContainerConfig::from_lookup(lookup(&[]));

        assert_eq!(config.api_key, None);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN]);
        assert_eq!(config.chat_retry.max_attempts(), 3);
        assert_eq!(config.chat_retry.backoff(), Duration::from_secs(2));
        assert_eq!(config.categorize_retry.max_attempts(), 1);
        assert_eq!(config.category_policy, CategoryPolicy::ClosedSet);
        assert_eq!(config.triage_concurrency, DEFAULT_TRIAGE_CONCURRENCY);
    }

    #[test]
    fn environment_overrides_are_applied() {
        let config = ContainerConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("CAMPUSFIX_ALLOWED_ORIGINS", "https://campusfix.example.edu, https://admin.example.edu"),
            ("CAMPUSFIX_CATEGORY_MODE", "free"),
            ("CAMPUSFIX_CATEGORIZE_ATTEMPTS", "3"),
            ("CAMPUSFIX_RETRY_BACKOFF_MS", "250"),
            ("CAMPUSFIX_TRIAGE_CONCURRENCY", "8"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(
            config.allowed_origins,
            vec!["https://campusfix.example.edu", "https://admin.example.edu"]
        );
        assert_eq!(config.category_policy, CategoryPolicy::FreeForm);
        assert_eq!(config.categorize_retry.max_attempts(), 3);
        assert_eq!(config.chat_retry.backoff(), Duration::from_millis(250));
        assert_eq!(config.triage_concurrency, 8);
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let config = ContainerConfig::from_lookup(lookup(&[
            ("CAMPUSFIX_CHAT_ATTEMPTS", "many"),
            ("CAMPUSFIX_TRIAGE_CONCURRENCY", "-2"),
            ("GEMINI_API_KEY", "   "),
        ]));

        assert_eq!(config.chat_retry.max_attempts(), 3);
        assert_eq!(config.triage_concurrency, DEFAULT_TRIAGE_CONCURRENCY);
        assert_eq!(config.api_key, None);
    }

    #[tokio::test]
    async fn mock_container_wires_relay_state() {
        let config = ContainerConfig {
            mock_llm: true,
            ..ContainerConfig::default()
        };
        let container = Container::new(config).await.unwrap();

        let state = container.relay_state();
        assert_eq!(state.model, "mock-chat");
        assert!(state.cors.is_allowed(DEFAULT_ALLOWED_ORIGIN));
    }
}
