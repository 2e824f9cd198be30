//! Клиент Google Translate TTS
//!
//! Тот же эндпоинт, которым пользуется gTTS: GET запрос с текстом и кодом
//! языка возвращает закодированный MP3. Вся конфигурация (язык, эндпоинт,
//! политика повторов) передаётся явно при создании клиента; клиент не
//! читает никакого глобального состояния.

use reqwest::Client;

use crate::audio::AudioClip;
use crate::config::GoogleTtsConfig;
use crate::error::{DictationError, Result};
use crate::retry;
use crate::tts::SpeechSynthesizer;

pub struct GoogleTtsClient {
    client: Client,
    config: GoogleTtsConfig,
}

impl GoogleTtsClient {
    /// Создаёт новый клиент Google TTS
    pub fn new(config: GoogleTtsConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn language(&self) -> &str {
        &self.config.language
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for GoogleTtsClient {
    async fn synthesize(&self, text: &str, slow: bool) -> Result<AudioClip> {
        if text.trim().is_empty() {
            return Err(DictationError::InvalidArgument(
                "Cannot synthesize empty text".to_string(),
            ));
        }

        log::debug!(
            "Requesting TTS for \"{}\" (lang={}, slow={})",
            text,
            self.config.language,
            slow
        );

        let bytes = retry::retry_with_backoff(&self.config.retry, "google_tts", || {
            let client = self.client.clone();
            let endpoint = self.config.endpoint.clone();
            let language = self.config.language.clone();
            let text = text.to_string();

            async move {
                let response = client
                    .get(&endpoint)
                    .query(&[
                        ("ie", "UTF-8"),
                        ("client", "tw-ob"),
                        ("tl", language.as_str()),
                        ("ttsspeed", if slow { "0.3" } else { "1" }),
                        ("q", text.as_str()),
                    ])
                    .send()
                    .await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(DictationError::Tts(format!(
                        "TTS endpoint returned status {}: {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    )));
                }

                let body: bytes::Bytes = response.bytes().await?;
                if body.is_empty() {
                    return Err(DictationError::Tts(
                        "TTS endpoint returned an empty body".to_string(),
                    ));
                }

                Ok(body)
            }
        })
        .await?;

        AudioClip::decode(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;

    fn unreachable_config() -> GoogleTtsConfig {
        GoogleTtsConfig {
            language: "cs".to_string(),
            // закрытый порт: запрос падает сразу, без обращения в сеть
            endpoint: "http://127.0.0.1:1/translate_tts".to_string(),
            retry: RetryConfig {
                max_attempts: 1,
                initial_delay_secs: 0.01,
                backoff_factor: 2.0,
                max_delay_secs: 0.01,
            },
        }
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_request() {
        let client = GoogleTtsClient::new(unreachable_config());
        let result = client.synthesize("   ", true).await;
        assert!(matches!(result, Err(DictationError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_http_error() {
        let client = GoogleTtsClient::new(unreachable_config());
        let result = client.synthesize("Pes běhá.", true).await;
        assert!(matches!(result, Err(DictationError::Http(_))));
    }
}
