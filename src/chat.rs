//! Question answering over analyzed documents via OpenRouter.
//!
//! The extracted document text rides in the system prompt; the user message
//! carries the question. One request per call, no history.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Documents longer than this are truncated before prompting.
const MAX_CONTEXT_CHARS: usize = 150_000;

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatClient {
    /// Create a client, reading the API key from `OPENROUTER_API_KEY`.
    pub fn from_env(client: Client) -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .context("OPENROUTER_API_KEY environment variable not set")?;
        let model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Answer a question about the given document text.
    pub async fn answer(&self, question: &str, document_text: &str) -> Result<String> {
        let system_prompt = format!(
            "You are a legal assistant. Answer questions about the document below \
             in plain language. If the answer is not in the document, say so.\n\n\
             --- DOCUMENT START ---\n\n{}\n\n--- DOCUMENT END ---",
            truncate_for_context(document_text, MAX_CONTEXT_CHARS)
        );

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system_prompt), Message::user(question)],
            max_tokens: Some(4096),
        };

        debug!("ChatClient: sending question to model {}", request.model);

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenRouter")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenRouter API error ({}): {}", status, error_text);
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse OpenRouter response")?;

        let answer = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        info!("ChatClient: received answer ({} chars)", answer.len());
        Ok(answer)
    }
}

/// Truncate on a character boundary so huge documents fit the prompt.
fn truncate_for_context(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}\n\n[... document truncated ...]", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_for_context("hello", 100), "hello");
    }

    #[test]
    fn long_text_is_truncated_with_marker() {
        let text = "a".repeat(50);
        let result = truncate_for_context(&text, 10);
        assert!(result.starts_with("aaaaaaaaaa\n"));
        assert!(result.ends_with("[... document truncated ...]"));
    }
}
