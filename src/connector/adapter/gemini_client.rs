use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::domain::{DomainError, GenerationRequest};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiContent<'a>>,
    contents: Vec<ApiContent<'a>>,
}

#[derive(Serialize)]
struct ApiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<ApiPart<'a>>,
}

#[derive(Serialize)]
struct ApiPart<'a> {
    text: &'a str,
}

/// Subset of the `generateContent` response we read.
#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// HTTP client for the Google Generative Language `generateContent` API.
///
/// The API key travels in the `x-goog-api-key` header, never in the URL, and
/// is only ever held by the server process. Without a key every call fails
/// with a configuration error before touching the network.
///
/// Failures are classified for the retry policy: HTTP 503 is a transient
/// overload, other non-success statuses and malformed bodies are terminal,
/// connection problems and timeouts are network errors.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(request: &GenerationRequest) -> ApiRequest<'_> {
        ApiRequest {
            system_instruction: request.system_prompt().map(|text| ApiContent {
                role: None,
                parts: vec![ApiPart { text }],
            }),
            contents: vec![ApiContent {
                role: Some("user"),
                parts: vec![ApiPart {
                    text: request.user_text(),
                }],
            }],
        }
    }

    /// Text of the first part of the first candidate, if any.
    fn extract_text(response: ApiResponse) -> Option<String> {
        response
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }

    /// Prefer the provider's own error message over the raw body.
    fn error_detail(body: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) if !parsed.error.status.is_empty() => {
                format!("{} ({})", parsed.error.message, parsed.error.status)
            }
            Ok(parsed) => parsed.error.message,
            Err(_) => body.trim().to_string(),
        }
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        self.ensure_configured()?;
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&Self::build_request(request))
            .send()
            .await
            .map_err(|e| DomainError::network(format!("GeminiClient: request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(DomainError::from_provider_status(
                status.as_u16(),
                Self::error_detail(&body),
            ));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::terminal(format!("GeminiClient: failed to parse response: {e}"))
        })?;

        let text = Self::extract_text(api_response).ok_or_else(|| {
            DomainError::terminal("GeminiClient: response contained no candidate text")
        })?;

        debug!("GeminiClient: received {} chars from {}", text.len(), self.model);
        Ok(text)
    }

    fn ensure_configured(&self) -> Result<(), DomainError> {
        if self.api_key.is_some() {
            Ok(())
        } else {
            Err(DomainError::configuration(
                "GEMINI_API_KEY is not set; cannot call the generative-text provider",
            ))
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
