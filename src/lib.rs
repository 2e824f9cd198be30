//! Основной файл библиотеки diktator
//!
//! Библиотека генерирует, озвучивает и оценивает диктанты для учеников
//! начальной школы: предложения создаёт LLM, озвучка собирается из
//! TTS-сегментов по педагогическому протоколу раскладки, рукописный
//! результат распознаётся vision-моделью и оценивается LLM-учителем.

pub mod audio;
pub mod compose;
pub mod config;
pub mod error;
pub mod llm;
pub mod retry;
pub mod storage;
pub mod text;
pub mod tts;

use std::path::Path;

pub use crate::audio::{AudioClip, PauseKind, SegmentKind, Track};
pub use crate::compose::DictationComposer;
pub use crate::config::{
    AudioFormat, DictationConfig, GoogleTtsConfig, LayoutProtocol, LlmConfig, RetryConfig,
    TempoMode,
};
pub use crate::error::{DictationError, Result};
pub use crate::llm::evaluator::Evaluation;
pub use crate::llm::generator::GeneratedDictation;
pub use crate::llm::ocr::ExtractedText;
pub use crate::tts::{GoogleTtsClient, SpeechSynthesizer};

/// Основная структура для работы с библиотекой
pub struct Diktator {
    /// Конфигурация библиотеки
    config: DictationConfig,
}

impl Diktator {
    /// Создаёт новый экземпляр с указанной конфигурацией
    pub fn new(config: DictationConfig) -> Self {
        Self { config }
    }

    /// Создаёт экземпляр с настройками по умолчанию
    pub fn with_defaults() -> Self {
        Self::new(DictationConfig::default())
    }

    pub fn config(&self) -> &DictationConfig {
        &self.config
    }

    /// Генерирует предложения диктанта для указанного класса школы
    pub async fn generate(&self, grade: u8, num_sentences: usize) -> Result<GeneratedDictation> {
        let client = llm::LlmClient::new(self.config.llm.clone())?;
        llm::generator::generate_sentences(&client, grade, num_sentences).await
    }

    /// Озвучивает диктант и записывает аудиофайл по указанному пути
    ///
    /// Используются пауза между предложениями и темп речи из конфигурации.
    pub async fn dictate(&self, sentences: &[String], output_path: &Path) -> Result<()> {
        self.dictate_with(
            sentences,
            self.config.default_sentence_pause_secs,
            self.config.slow,
            output_path,
        )
        .await
    }

    /// Озвучивает диктант с явной паузой между предложениями и темпом речи
    pub async fn dictate_with(
        &self,
        sentences: &[String],
        pause_duration: f64,
        slow: bool,
        output_path: &Path,
    ) -> Result<()> {
        log::info!("Starting dictation audio generation");

        let synthesizer = GoogleTtsClient::new(self.config.tts.clone());
        let composer = DictationComposer::new(&synthesizer, &self.config);

        let track = composer.compose_track(sentences, pause_duration, slow).await?;
        track.export(output_path, self.config.output_format)
    }

    /// Распознаёт фотографию рукописного диктанта и оценивает её
    /// относительно оригинального текста
    pub async fn evaluate_image(
        &self,
        image_path: &Path,
        original_text: &str,
    ) -> Result<Evaluation> {
        let client = llm::LlmClient::new(self.config.llm.clone())?;

        let extracted = llm::ocr::extract_text_from_image(&client, image_path).await?;
        log::info!(
            "Extracted {} chars from image, starting evaluation",
            extracted.extracted_text.len()
        );

        llm::evaluator::evaluate_dictation(&client, original_text, &extracted.extracted_text).await
    }
}

/// Публичный API для удобного использования: озвучивает список предложений
/// в один аудиофайл с настройками по умолчанию и указанным языком
pub async fn generate_dictation_audio(
    sentences: &[String],
    output_path: &Path,
    pause_duration: f64,
    slow: bool,
    language: &str,
) -> Result<()> {
    let mut config = DictationConfig::default();
    config.tts.language = language.to_string();

    let synthesizer = GoogleTtsClient::new(config.tts.clone());
    let composer = DictationComposer::new(&synthesizer, &config);

    let track = composer.compose_track(sentences, pause_duration, slow).await?;
    track.export(output_path, config.output_format)
}
