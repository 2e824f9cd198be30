//! Распознавание рукописного текста диктанта через vision LLM

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{DictationError, Result};
use crate::llm::LlmClient;

const OCR_PROMPT: &str = "Přečti prosím text z tohoto obrázku diktátu.\n\n\
    Je to psaný text od žáka základní školy. Snaž se přečíst všechny věty, \
    i když může být písmo někdy nečitelné.\n\n\
    Vrať pouze přečtený text, větu po větě, každou na novém řádku. \
    Nepiš nic dalšího, jen samotný text.";

/// Текст, извлечённый с фотографии диктанта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Распознанный текст
    pub extracted_text: String,
    /// Время распознавания (ISO 8601)
    pub timestamp: String,
}

/// MIME тип по расширению файла изображения
fn media_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Извлекает текст с фотографии рукописного диктанта
pub async fn extract_text_from_image(client: &LlmClient, image_path: &Path) -> Result<ExtractedText> {
    let image_bytes = std::fs::read(image_path)?;
    let image_base64 = STANDARD.encode(&image_bytes);
    let data_url = format!("data:{};base64,{}", media_type(image_path), image_base64);

    log::info!(
        "Extracting text from image {} ({} bytes)",
        image_path.display(),
        image_bytes.len()
    );

    let content = serde_json::json!([
        {
            "type": "image_url",
            "image_url": { "url": data_url }
        },
        {
            "type": "text",
            "text": OCR_PROMPT
        }
    ]);

    let extracted = client
        .chat(content, 0.1, 2000)
        .await
        .map_err(|e| DictationError::Ocr(e.to_string()))?;

    if extracted.is_empty() {
        return Err(DictationError::Ocr(
            "Vision model returned no text".to_string(),
        ));
    }

    Ok(ExtractedText {
        extracted_text: extracted,
        timestamp: chrono::Local::now().to_rfc3339(),
    })
}
