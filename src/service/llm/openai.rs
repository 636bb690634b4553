//! OpenAI implementation of the LLM client.
//!
//! A thin wrapper around async-openai chat completions. Every call is
//! bounded by the configured timeout; expiry surfaces as an ordinary
//! error, which the evaluator boundary then converts into a degraded
//! decision. There is deliberately no retry loop here.

use std::sync::Arc;
use std::time::Duration;

use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::base::{config::Config, types::Res};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self::new(Arc::new(client))
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());

        Self {
            client: Client::with_config(cfg),
            config: config.clone(),
        }
    }

    /// Issue one bounded chat-completion call and return the first
    /// choice's text.
    async fn chat(&self, model: &str, system: &str, user: &str) -> Res<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .temperature(self.config.openai_temperature)
            .max_completion_tokens(self.config.openai_max_tokens)
            .messages(vec![
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: ChatCompletionRequestSystemMessageContent::Text(system.to_string()),
                    name: Some("System".to_string()),
                }),
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: ChatCompletionRequestUserMessageContent::Text(user.to_string()),
                    name: Some("User".to_string()),
                }),
            ])
            .build()?;

        let bound = Duration::from_secs(self.config.llm_timeout_secs);
        let response = match timeout(bound, self.client.chat().create(request)).await {
            Ok(result) => result?,
            Err(_) => return Err(anyhow::anyhow!("OpenAI call timed out after {}s", self.config.llm_timeout_secs)),
        };

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("OpenAI reply contained no message content"))?;

        debug!("OpenAI reply: {} chars", text.len());

        Ok(text)
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::complete", skip_all)]
    async fn complete(&self, system: &str, user: &str) -> Res<String> {
        self.chat(&self.config.openai_evaluator_model, system, user).await
    }

    #[instrument(name = "OpenAiLlmClient::resolve", skip_all)]
    async fn resolve(&self, system: &str, user: &str) -> Res<String> {
        self.chat(&self.config.openai_resolver_model, system, user).await
    }
}
