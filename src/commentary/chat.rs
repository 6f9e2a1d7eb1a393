//! Chat-completions client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{prompts, Commentator, Subject};
use crate::config::CommentaryConfig;
use crate::error::{ChartError, Result};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
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

pub struct ChatCommentator {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatCommentator {
    pub fn new(config: &CommentaryConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("bodygraph-ocr")
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: api_key.into(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

impl Commentator for ChatCommentator {
    fn explain(&self, subject: &Subject) -> Result<String> {
        let (system, user) = prompts::build(subject);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: &user },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!("Requesting commentary for {}", subject);
        let response: ChatResponse = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ChartError::CommentaryResponse("no message content in first choice".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{Center, CHANNELS};
    use httpmock::prelude::*;

    fn config_for(server: &MockServer) -> CommentaryConfig {
        CommentaryConfig {
            endpoint: server.url("/v1/chat/completions"),
            timeout_secs: 5,
            ..CommentaryConfig::default()
        }
    }

    #[test]
    fn test_returns_first_choice_content() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .body_contains("\"model\":\"gpt-4\"")
                .body_contains("channel 10-20");
            then.status(200).json_body(serde_json::json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "  Awakening brings clarity.\n" } },
                    { "message": { "role": "assistant", "content": "ignored" } }
                ]
            }));
        });

        let commentator = ChatCommentator::new(&config_for(&server), "test-key").unwrap();
        let channel = CHANNELS.iter().find(|c| c.id() == "10-20").unwrap();
        let text = commentator.explain(&Subject::Channel(channel)).unwrap();

        mock.assert();
        assert_eq!(text, "Awakening brings clarity.");
    }

    #[test]
    fn test_http_error_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).body("rate limited");
        });

        let commentator = ChatCommentator::new(&config_for(&server), "test-key").unwrap();
        let result = commentator.explain(&Subject::Center { center: Center::Sacral, defined: true });
        assert!(matches!(result, Err(ChartError::Commentary(_))));
    }

    #[test]
    fn test_empty_choices_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({ "choices": [] }));
        });

        let commentator = ChatCommentator::new(&config_for(&server), "test-key").unwrap();
        let result = commentator.explain(&Subject::Center { center: Center::Head, defined: false });
        assert!(matches!(result, Err(ChartError::CommentaryResponse(_))));
    }
}
