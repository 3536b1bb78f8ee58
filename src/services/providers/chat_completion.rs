/// OpenAI-compatible chat-completion provider (Groq by default)
///
/// Sends one system message and one user message, asks for JSON-object output
/// mode and returns the content of the first choice untouched. Parsing that
/// content is the normalizer's job.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    services::{prompt::PromptPayload, providers::CompletionProvider},
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sampling temperature for every request
pub const TEMPERATURE: f32 = 0.8;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Error body shape shared by OpenAI-compatible providers
#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

#[derive(Clone)]
pub struct ChatCompletionProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl ChatCompletionProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(
        api_key: Option<String>,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.api_key(),
            config.completion_api_url.clone(),
            config.completion_model.clone(),
            Duration::from_secs(config.completion_timeout_secs),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }

    fn transport_error(&self, error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            tracing::warn!(provider = self.name(), "Completion request timed out");
        }
        AppError::HttpClient(error)
    }

    /// Pulls a readable message out of a provider error body
    fn error_message(body: &str) -> String {
        serde_json::from_str::<ProviderErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string())
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ChatCompletionProvider {
    async fn complete(&self, prompt: &PromptPayload) -> AppResult<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "Completion API key is missing. Set GROQ_API_KEY in the environment.".to_string(),
            )
        })?;

        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                provider = self.name(),
                "Completion API error"
            );
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: Self::error_message(&body),
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AppError::EmptyCompletion)?;

        tracing::info!(
            model = %self.model,
            content_len = content.len(),
            provider = self.name(),
            "Completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "chat_completion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, models::Preference, services::prompt::build_prompt};
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Option<(HeaderMap, Value)>>>;

    /// Serves a canned chat-completion response on a random local port
    async fn spawn_upstream(status: StatusCode, body: Value) -> (String, Captured) {
        spawn_slow_upstream(status, body, Duration::ZERO).await
    }

    async fn spawn_slow_upstream(
        status: StatusCode,
        body: Value,
        delay: Duration,
    ) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(None));
        let sink = captured.clone();

        let app = Router::new().route(
            "/chat/completions",
            post(move |headers: HeaderMap, Json(request): Json<Value>| {
                let sink = sink.clone();
                let body = body.clone();
                async move {
                    *sink.lock().unwrap() = Some((headers, request));
                    tokio::time::sleep(delay).await;
                    (status, Json(body))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), captured)
    }

    fn prompt() -> PromptPayload {
        build_prompt(&Preference::new("Beach", 5000, "4-7 days", "2"))
    }

    fn provider(api_url: String) -> ChatCompletionProvider {
        ChatCompletionProvider::new(
            Some("test_key".to_string()),
            api_url,
            "test-model".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_returns_first_choice_content() {
        let (url, captured) = spawn_upstream(
            StatusCode::OK,
            json!({ "choices": [{ "message": { "content": "{\"destinations\": []}" } }] }),
        )
        .await;

        let content = provider(url).complete(&prompt()).await.unwrap();
        assert_eq!(content, "{\"destinations\": []}");

        let (headers, request) = captured.lock().unwrap().take().unwrap();
        assert_eq!(headers["authorization"], "Bearer test_key");
        assert_eq!(request["model"], "test-model");
        assert_eq!(request["response_format"]["type"], "json_object");
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(request["messages"][1]["role"], "user");
        assert_eq!(request["messages"][1]["content"], prompt().user);
        let temperature = request["temperature"].as_f64().unwrap();
        assert!((0.7..=0.8).contains(&(temperature as f32)));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        // Nothing listens on this address; a network attempt would be a transport error
        let provider = ChatCompletionProvider::new(
            None,
            "http://127.0.0.1:9".to_string(),
            "test-model".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = provider.complete(&prompt()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_non_success_status_surfaces_provider_message() {
        let (url, _) = spawn_upstream(
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "message": "Rate limit reached" } }),
        )
        .await;

        match provider(url).complete(&prompt()).await {
            Err(AppError::Upstream { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stalled_upstream_times_out_as_transport_error() {
        let (url, _) = spawn_slow_upstream(
            StatusCode::OK,
            json!({ "choices": [{ "message": { "content": "[]" } }] }),
            Duration::from_secs(10),
        )
        .await;
        let provider = ChatCompletionProvider::new(
            Some("test_key".to_string()),
            url,
            "test-model".to_string(),
            Duration::from_millis(200),
        )
        .unwrap();

        match provider.complete(&prompt()).await {
            Err(AppError::HttpClient(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_content_is_distinct_error() {
        for body in [
            json!({ "choices": [] }),
            json!({ "choices": [{ "message": { "content": null } }] }),
            json!({ "choices": [{ "message": { "content": "  " } }] }),
        ] {
            let (url, _) = spawn_upstream(StatusCode::OK, body).await;
            let err = provider(url).complete(&prompt()).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EmptyCompletion);
        }
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(
            ChatCompletionProvider::error_message("upstream exploded"),
            "upstream exploded"
        );
    }
}
