//! Модуль конфигурации библиотеки diktator
//!
//! Этот модуль содержит структуры и перечисления для настройки библиотеки.

use serde::{Deserialize, Serialize};

/// Протокол раскладки диктанта
///
/// Исторически существуют два варианта раскладки; выбор влияет на структуру
/// итоговой аудиодорожки, поэтому он задаётся явно конфигурацией.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LayoutProtocol {
    /// Каждое предложение: целиком, по словам с паузами, целиком ещё раз
    WordByWord,
    /// Превью всего текста, каждое предложение три раза подряд, полный повтор в конце
    TripleRepeat,
}

impl Default for LayoutProtocol {
    fn default() -> Self {
        Self::WordByWord
    }
}

/// Стратегия изменения темпа (используется протоколом TripleRepeat)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TempoMode {
    /// Наивная переинтерпретация частоты дискретизации.
    /// Быстро и без внешних зависимостей, но меняет высоту тона.
    ResampleReinterpret,
    /// Фильтр atempo через ffmpeg: сохраняет высоту тона,
    /// требует установленного ffmpeg.
    FfmpegAtempo,
}

impl Default for TempoMode {
    fn default() -> Self {
        Self::ResampleReinterpret
    }
}

/// Формат выходного аудиофайла
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AudioFormat {
    /// MP3 (кодируется через ffmpeg)
    Mp3,
    /// WAV (записывается напрямую, без внешних инструментов)
    Wav,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::Mp3
    }
}

impl AudioFormat {
    /// Расширение файла для формата
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }
}

/// Параметры повторных попыток для обращений к внешним сервисам
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Максимальное количество попыток (включая первую)
    pub max_attempts: u32,
    /// Начальная задержка в секундах
    pub initial_delay_secs: f64,
    /// Множитель экспоненциального роста задержки
    pub backoff_factor: f64,
    /// Максимальная задержка в секундах
    pub max_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_secs: 1.0,
            backoff_factor: 2.0,
            max_delay_secs: 60.0,
        }
    }
}

/// Конфигурация клиента Google Translate TTS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTtsConfig {
    /// Код языка синтеза (например "cs")
    pub language: String,
    /// Базовый URL эндпоинта синтеза
    pub endpoint: String,
    /// Параметры повторных попыток
    pub retry: RetryConfig,
}

impl Default for GoogleTtsConfig {
    fn default() -> Self {
        Self {
            language: "cs".to_string(),
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            retry: RetryConfig::default(),
        }
    }
}

/// Конфигурация OpenAI-совместимого LLM клиента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API ключ
    pub api_key: String,
    /// Базовый URL (OpenAI-совместимый сервер)
    pub base_url: String,
    /// Имя модели
    pub model: String,
    /// Параметры повторных попыток
    pub retry: RetryConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            retry: RetryConfig::default(),
        }
    }
}

/// Конфигурация библиотеки
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictationConfig {
    /// Конфигурация TTS
    pub tts: GoogleTtsConfig,
    /// Конфигурация LLM (генерация, OCR, оценка)
    pub llm: LlmConfig,
    /// Протокол раскладки диктанта
    pub protocol: LayoutProtocol,
    /// Стратегия изменения темпа
    pub tempo: TempoMode,
    /// Коэффициент скорости для протокола TripleRepeat (< 1.0 замедляет)
    pub speed_factor: f64,
    /// Короткая пауза между фазами предложения, секунды
    pub short_pause_secs: f64,
    /// Пауза между словами, секунды
    pub word_pause_secs: f64,
    /// Переходная пауза протокола TripleRepeat, секунды
    pub transition_pause_secs: f64,
    /// Длинная пауза между предложениями по умолчанию, секунды
    pub default_sentence_pause_secs: f64,
    /// Медленная речь по умолчанию
    pub slow: bool,
    /// Частота дискретизации дорожки, Гц
    pub sample_rate: u32,
    /// Формат выходного файла
    pub output_format: AudioFormat,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self {
            tts: GoogleTtsConfig::default(),
            llm: LlmConfig::default(),
            protocol: LayoutProtocol::default(),
            tempo: TempoMode::default(),
            speed_factor: 1.0,
            short_pause_secs: 2.0,
            word_pause_secs: 3.0,
            transition_pause_secs: 3.0,
            default_sentence_pause_secs: 5.0,
            slow: true,
            sample_rate: 24000,
            output_format: AudioFormat::default(),
        }
    }
}
