//! Groq chat-completion client.
//!
//! Speaks the OpenAI-compatible `/chat/completions` wire format hosted at
//! `api.groq.com`. Exactly one outbound request per [`generate`] call.
//!
//! [`generate`]: crate::GenerationClient::generate

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::document::Generation;
use crate::error::{RagError, Result};
use crate::generation::GenerationClient;

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// A [`GenerationClient`] backed by the Groq chat-completion API.
///
/// # Example
///
/// ```rust,ignore
/// use review_rag::groq::GroqClient;
///
/// let client = GroqClient::from_env()?.with_model("llama3-70b-8192");
/// let generation = client.generate("best headphones\nProduct: ...").await?;
/// ```
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl GroqClient {
    /// Create a client with the given API key and the default model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Config("Groq API key must not be empty".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_MODEL.into(),
            url: GROQ_CHAT_URL.into(),
        })
    }

    /// Create a client from the `GROQ_API_KEY` environment variable.
    ///
    /// Intended to run once at process start; a missing key fails
    /// construction rather than individual requests.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| {
            RagError::Config("GROQ_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint URL, for proxies or compatible servers.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

// ── wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Tolerant response shape: any missing piece of the content path yields an
/// empty answer rather than a parse failure.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl GenerationClient for GroqClient {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        debug!(model = %self.model, prompt_len = prompt.len(), "requesting completion");

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "completion request failed");
                RagError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let raw = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&raw)
                .map(|b| b.error.message)
                .unwrap_or(raw);
            error!(status, "provider returned error");
            return Err(RagError::Provider { status, detail });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse completion response");
            RagError::Transport(format!("malformed provider response: {e}"))
        })?;

        // A success response with no content path is an empty answer.
        let answer = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();

        Ok(Generation { answer })
    }
}
