//! Модуль для интеграции с OpenAI-совместимым LLM API
//!
//! Один общий клиент chat completions обслуживает генерацию предложений,
//! распознавание рукописного текста и оценку диктанта. Конфигурация
//! (ключ, базовый URL, модель) передаётся явно при создании клиента.

pub mod evaluator;
pub mod generator;
pub mod ocr;

use reqwest::Client;
use serde::Deserialize;

use crate::config::LlmConfig;
use crate::error::{DictationError, Result};
use crate::retry;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Клиент OpenAI-совместимого chat completions API
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Создаёт новый LLM клиент
    pub fn new(config: LlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(DictationError::Configuration(
                "LLM API key is required".to_string(),
            ));
        }
        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    /// Отправляет одно пользовательское сообщение и возвращает текст ответа
    ///
    /// `content` — либо строка, либо массив частей (для vision запросов).
    pub async fn chat(
        &self,
        content: serde_json::Value,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let content_text = retry::retry_with_backoff(&self.config.retry, "llm_chat", || {
            let client = self.client.clone();
            let url = url.clone();
            let api_key = self.config.api_key.clone();
            let model = self.config.model.clone();
            let content = content.clone();

            async move {
                let response = client
                    .post(&url)
                    .header("Authorization", format!("Bearer {}", api_key))
                    .json(&serde_json::json!({
                        "model": model,
                        "messages": [
                            {
                                "role": "user",
                                "content": content
                            }
                        ],
                        "temperature": temperature,
                        "max_tokens": max_tokens
                    }))
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(DictationError::Other(format!(
                        "LLM API returned status {}: {}",
                        status,
                        body.chars().take(500).collect::<String>()
                    )));
                }

                let parsed: ChatResponse = response.json().await?;
                let message = parsed
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
                    .ok_or_else(|| {
                        DictationError::Other("LLM response contains no choices".to_string())
                    })?;

                Ok(message.trim().to_string())
            }
        })
        .await?;

        Ok(content_text)
    }
}
