//! Chat completion client

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::ChatCompleter;
use crate::session::{Message, Role};
use crate::{Error, Result};

/// One message in the chat API wire format
#[derive(serde::Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Request to the chat completions API
#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

/// Response from the chat completions API
#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(serde::Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Generates assistant replies via the hosted chat completions endpoint
pub struct ChatClient {
    client: reqwest::Client,
    api_key: SecretString,
    api_url: String,
    model: String,
}

impl ChatClient {
    /// Create a new chat client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: SecretString, api_url: String, model: String) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config(
                "API key required for chat completions".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            api_url,
            model,
        })
    }
}

#[async_trait]
impl ChatCompleter for ChatClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        if !messages.iter().any(|m| m.role == Role::User) {
            return Err(Error::ChatCompletion(
                "conversation has no user message".to_string(),
            ));
        }

        tracing::debug!(history_len = messages.len(), "starting chat completion");

        let request = ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: match m.role {
                        Role::User => "user",
                        Role::Assistant => "assistant",
                    },
                    content: &m.content,
                })
                .collect(),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "chat request failed");
                Error::ChatCompletion(e.to_string())
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "chat API error");
            return Err(Error::ChatCompletion(format!(
                "chat API error {status}: {body}"
            )));
        }

        let result: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse chat response");
            Error::ChatCompletion(e.to_string())
        })?;

        let reply = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::ChatCompletion("response contained no choices".to_string()))?;

        tracing::info!(reply_chars = reply.len(), "chat completion complete");
        Ok(reply)
    }
}
