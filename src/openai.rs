use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::LlmConfig;
use crate::ChatMessage;

// Structures matching the OpenAI-compatible /chat/completions endpoint
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Request a single (non-streaming) completion and return the reply text.
pub async fn create_chat_completion(
    client: &Client,
    cfg: &LlmConfig,
    model: &str,
    messages: &[ChatMessage],
    max_tokens: Option<u32>,
) -> Result<String> {
    let url = cfg.completions_url();
    let payload = ChatCompletionRequest {
        model,
        messages,
        max_tokens,
    };

    debug!(%url, model, num_messages = messages.len(), "Sending completion request");

    let mut request = client.post(&url).json(&payload);
    if !cfg.api_key.is_empty() {
        request = request.bearer_auth(&cfg.api_key);
    }

    let response = request
        .send()
        .await
        .context(format!("Failed to send request to completion API at {}", url))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        error!(%status, %error_body, "Completion API request failed");
        return Err(anyhow::anyhow!(
            "Completion API request failed with status {}: {}",
            status,
            error_body
        ));
    }

    let completion = response
        .json::<ChatCompletionResponse>()
        .await
        .context("Failed to parse JSON response from completion API")?;

    let text = completion
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .unwrap_or_default();

    debug!(reply = %text, "Received completion response");

    Ok(text.trim().to_string())
}
