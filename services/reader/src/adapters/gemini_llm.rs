//! services/reader/src/adapters/gemini_llm.rs
//!
//! This module contains the adapter for the generative content provider.
//! It implements the `ContentGenerationService` port from the `core` crate by
//! talking to Gemini through its OpenAI-compatible chat endpoint.

use crate::config::Config;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use maidat_core::ports::{ContentGenerationService, GenerationRequest, PortError, PortResult};
use std::time::Duration;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ContentGenerationService` using structured output
/// (`response_format = json_schema`) on an OpenAI-compatible chat endpoint.
#[derive(Clone)]
pub struct GeminiContentAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl GeminiContentAdapter {
    /// Creates a new `GeminiContentAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }

    /// Creates the adapter and its client from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.gemini_api_key.clone())
            .with_api_base(config.gemini_api_base.clone());
        Self::new(
            Client::with_config(openai_config),
            config.content_model.clone(),
            config.request_timeout,
        )
    }

    fn build_chat_request(
        &self,
        request: &GenerationRequest,
    ) -> PortResult<CreateChatCompletionRequest> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_instructions.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.as_str())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: None,
                name: request.schema_name.clone(),
                schema: Some(request.response_schema.clone()),
                strict: Some(true),
            },
        };

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(response_format)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

//=========================================================================================
// `ContentGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentGenerationService for GeminiContentAdapter {
    /// Sends one schema-constrained request and returns the first choice's text.
    async fn generate_structured(&self, request: &GenerationRequest) -> PortResult<String> {
        let chat_request = self.build_chat_request(request)?;
        debug!(model = %self.model, schema = %request.schema_name, "Sending structured generation request");

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(chat_request))
            .await
            .map_err(|_| PortError::Timeout(self.timeout))?
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or(PortError::EmptyResponse)?
            .message;

        if let Some(refusal) = message.refusal {
            return Err(PortError::Unexpected(format!(
                "Provider refused the request: {}",
                refusal
            )));
        }

        match message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(PortError::EmptyResponse),
        }
    }
}
