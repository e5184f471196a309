//! LLM API interaction.
//!
//! This module provides the single text-generation call the newspaper needs:
//! one prompt in, one block of generated text out. Requests go to an
//! OpenAI-compatible `chat/completions` endpoint with the model, temperature
//! and token limit taken from [`NewsConfig`].
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait defining async LLM interaction
//! - [`OpenAiClient`]: `reqwest`-backed implementation of [`AskAsync`]
//!
//! Calls are made one at a time and are never retried; any transport or API
//! error aborts the run.

use crate::config::NewsConfig;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a model and return the generated text.
/// The pipeline is generic over this trait so tests can drive it with a
/// canned response.
pub trait AskAsync {
    /// Send `prompt` to the model and return the generated text.
    async fn ask(&self, prompt: &str) -> Result<String, Box<dyn Error>>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions API.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl OpenAiClient {
    /// Build a client from the run configuration and a credential that has
    /// already been checked by [`crate::config::require_api_key`].
    pub fn new(config: &NewsConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: config.completions_url(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

impl AskAsync for OpenAiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %truncate_for_log(&body, 300), "API call failed");
            return Err(format!("chat completion failed with {status}: {}", truncate_for_log(&body, 300)).into());
        }

        let parsed: ChatResponse = response.json().await?;
        let text = extract_text(parsed)?;
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = text.len(),
            "Received completion"
        );
        debug!(preview = %truncate_for_log(&text, 120), "Completion preview");
        Ok(text)
    }
}

fn extract_text(response: ChatResponse) -> Result<String, Box<dyn Error>> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| "chat completion returned no content".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAiClient {
        OpenAiClient::new(&NewsConfig::default(), "sk-test".to_string())
    }

    #[test]
    fn test_request_body_shape() {
        let client = client();
        let body = serde_json::to_value(client.request("Main Headlines")).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 700);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Main Headlines");
        let temperature = body["temperature"].as_f64().unwrap();
        assert!((temperature - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("chat/completions"));
    }

    #[test]
    fn test_extract_text_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"SUMMARY"}},
                           {"message":{"role":"assistant","content":"other"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "SUMMARY");
    }

    #[test]
    fn test_extract_text_no_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_text(response).is_err());
    }

    #[test]
    fn test_extract_text_null_content() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(extract_text(response).is_err());
    }
}
