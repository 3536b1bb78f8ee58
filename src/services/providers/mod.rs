/// Chat-completion provider abstraction
///
/// The recommendation flow only needs "prompt in, text out". Keeping the provider
/// behind a trait lets the HTTP client be swapped (Groq, any OpenAI-compatible
/// endpoint) and lets tests run without network access.
use crate::{error::AppResult, services::prompt::PromptPayload};

pub mod chat_completion;

pub use chat_completion::ChatCompletionProvider;

/// Trait for chat-completion providers
///
/// Implementations perform exactly one outbound request per call and never retry;
/// retrying is left to the user.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the prompt and return the raw text of the first completion choice
    ///
    /// Fails with a configuration error before any network traffic when no
    /// credential is available, with a transport error on network failure or a
    /// non-2xx status, and with an empty-completion error when the service
    /// answers without content.
    async fn complete(&self, prompt: &PromptPayload) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
