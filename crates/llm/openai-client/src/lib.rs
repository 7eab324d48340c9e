//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for chat completions whose reply must follow a JSON schema
//! (structured outputs). Works against any OpenAI-compatible endpoint, e.g. Gemini's
//! `/v1beta/openai` compatibility layer. Provides token masking for safe logging.

use async_openai::types::{
    CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
};
use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;

pub use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_ascii() {
        return "***".to_string();
    }
    format!("{}***{}", &token[..7], &token[len - 4..])
}

/// Chat client for structured completions. Cheap to clone.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<OpenAIConfig>>,
    /// Kept only for masked logging.
    api_key_for_logging: String,
}

impl OpenAIClient {
    /// Builds a client using the given API key and the default OpenAI base URL.
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.clone());
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging: api_key,
        }
    }

    /// Builds a client with a custom base URL (proxies or OpenAI-compatible providers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.clone())
            .with_api_base(base_url.trim_end_matches('/'));
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging: api_key,
        }
    }

    /// Sends a chat completion constrained to `schema` and returns the raw reply text (the JSON
    /// document produced by the model). The caller is responsible for deserializing it.
    ///
    /// Errors when the request fails, the provider returns an error, or the reply has no content.
    pub async fn structured_completion(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
        schema_name: &str,
        schema: serde_json::Value,
    ) -> anyhow::Result<String> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            schema = %schema_name,
            api_key = %mask_token(&self.api_key_for_logging),
            "OpenAI structured_completion request"
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    name: schema_name.to_string(),
                    description: None,
                    schema: Some(schema),
                    strict: Some(true),
                },
            })
            .build()?;

        if let Ok(json) = serde_json::to_string(&request) {
            tracing::debug!(request_json = %json, "OpenAI structured_completion request JSON");
        }

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI structured_completion usage"
            );
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No response from model"))?;

        if let Some(refusal) = choice.message.refusal {
            anyhow::bail!("Model refused the request: {}", refusal);
        }

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => anyhow::bail!("Model returned an empty response"),
        }
    }
}
