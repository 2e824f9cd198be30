//! Модуль для работы с TTS
//!
//! Этот модуль содержит интерфейс синтезатора речи и его реализацию
//! поверх Google Translate TTS.

pub mod google;

pub use google::GoogleTtsClient;

use crate::audio::AudioClip;
use crate::error::Result;

/// Синтезатор речевых сегментов
///
/// Принимает произвольный UTF-8 текст в языке, заданном при создании
/// реализации. Идентичный вход при идентичных флагах должен давать
/// перцептивно идентичную речь; бит-в-бит идентичность не гарантируется.
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Синтезирует речь для текста, возвращает декодированный аудиоклип
    async fn synthesize(&self, text: &str, slow: bool) -> Result<AudioClip>;
}
