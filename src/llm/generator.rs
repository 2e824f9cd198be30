//! Генерация предложений диктанта через LLM

use serde::{Deserialize, Serialize};

use crate::error::{DictationError, Result};
use crate::llm::LlmClient;
use crate::text::{clean_generated_sentences, join_sentences};

/// Сгенерированный диктант
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDictation {
    /// Предложения диктанта
    pub sentences: Vec<String>,
    /// Класс школы (1-9)
    pub grade: u8,
    /// Время генерации (ISO 8601)
    pub timestamp: String,
    /// Все предложения одним текстом
    pub full_text: String,
    /// Количество предложений
    pub num_sentences: usize,
}

/// Генерирует предложения для диктанта по классу школы
pub async fn generate_sentences(
    client: &LlmClient,
    grade: u8,
    num_sentences: usize,
) -> Result<GeneratedDictation> {
    if !(1..=9).contains(&grade) {
        return Err(DictationError::InvalidArgument(format!(
            "Grade must be between 1 and 9, got {}",
            grade
        )));
    }
    if num_sentences == 0 {
        return Err(DictationError::InvalidArgument(
            "Number of sentences must be positive".to_string(),
        ));
    }

    let prompt = format!(
        "Vygeneruj {num_sentences} vět pro diktát v češtině pro žáky {grade}. třídy základní školy.\n\
         \n\
         Požadavky:\n\
         - Věty musí být přiměřené úrovni žáka {grade}. třídy\n\
         - Používej slovní zásobu a gramatiku odpovídající věku\n\
         - Každá věta musí být smysluplná a gramaticky správná\n\
         - Používej různou interpunkci (tečka, čárka, otazník, vykřičník)\n\
         - Věty by měly být různě dlouhé a pestré\n\
         \n\
         Vrať pouze seznam vět, každou na samostatném řádku, bez číslování.\n"
    );

    log::info!(
        "Generating {} dictation sentences for grade {}",
        num_sentences,
        grade
    );

    let content = client
        .chat(serde_json::Value::String(prompt), 0.8, 1000)
        .await
        .map_err(|e| DictationError::Generation(e.to_string()))?;

    let sentences = clean_generated_sentences(&content);
    if sentences.is_empty() {
        return Err(DictationError::Generation(
            "LLM returned no sentences".to_string(),
        ));
    }

    let full_text = join_sentences(&sentences);
    let num_sentences = sentences.len();

    Ok(GeneratedDictation {
        sentences,
        grade,
        timestamp: chrono::Local::now().to_rfc3339(),
        full_text,
        num_sentences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    fn offline_client() -> LlmClient {
        LlmClient::new(LlmConfig {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:1/v1".to_string(),
            ..LlmConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn grade_out_of_range_is_rejected_without_request() {
        let client = offline_client();
        for grade in [0u8, 10] {
            let result = generate_sentences(&client, grade, 5).await;
            assert!(matches!(result, Err(DictationError::InvalidArgument(_))));
        }
    }

    #[tokio::test]
    async fn zero_sentences_is_rejected() {
        let client = offline_client();
        let result = generate_sentences(&client, 3, 0).await;
        assert!(matches!(result, Err(DictationError::InvalidArgument(_))));
    }

    #[test]
    fn empty_api_key_is_a_configuration_error() {
        let result = LlmClient::new(LlmConfig::default());
        assert!(matches!(result, Err(DictationError::Configuration(_))));
    }
}
