//! Модуль обработки ошибок библиотеки diktator
//!
//! Этот модуль содержит типы ошибок, которые могут возникнуть при работе библиотеки.

use thiserror::Error;

/// Ошибки библиотеки diktator
#[derive(Debug, Error)]
pub enum DictationError {
    /// Неверный аргумент вызова (проверяется до обращения к внешним сервисам)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Ошибка синтеза речи с указанием фрагмента текста, на котором она произошла
    #[error("Speech synthesis failed for \"{fragment}\": {source}")]
    Synthesis {
        fragment: String,
        #[source]
        source: Box<DictationError>,
    },

    /// Ошибка HTTP запроса
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ошибка сервиса синтеза речи (HTTP статус, пустой ответ и т.п.)
    #[error("TTS service error: {0}")]
    Tts(String),

    /// Ошибка декодирования аудио
    #[error("Audio decoding error: {0}")]
    AudioDecoding(String),

    /// Ошибка обработки аудио
    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    /// Ошибка генерации диктанта через LLM
    #[error("Dictation generation error: {0}")]
    Generation(String),

    /// Ошибка распознавания текста с изображения
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Ошибка оценки диктанта
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Ошибка конфигурации
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Другая ошибка
    #[error("Other error: {0}")]
    Other(String),
}

impl DictationError {
    /// Оборачивает ошибку синтеза с контекстом фрагмента текста
    pub fn synthesis(fragment: impl Into<String>, source: DictationError) -> Self {
        DictationError::Synthesis {
            fragment: fragment.into(),
            source: Box::new(source),
        }
    }
}

impl From<&str> for DictationError {
    fn from(s: &str) -> Self {
        DictationError::Other(s.to_string())
    }
}

impl From<String> for DictationError {
    fn from(s: String) -> Self {
        DictationError::Other(s)
    }
}

/// Тип Result для библиотеки diktator
pub type Result<T> = std::result::Result<T, DictationError>;
