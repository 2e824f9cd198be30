//! Оценка диктанта: LLM выступает в роли учителя чешского языка

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DictationError, Result};
use crate::llm::LlmClient;

lazy_static! {
    static ref SCORE_LINE: Regex = Regex::new(r"SKÓRE:\s*(\d+)").unwrap();
}

/// Результат оценки диктанта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Полный текст оценки от модели
    pub evaluation_text: String,
    /// Оригинальный надиктованный текст
    pub original_text: String,
    /// Текст, написанный учеником
    pub written_text: String,
    /// Извлечённое скоре 0-100, если модель его указала
    pub score: Option<f32>,
    /// Время оценки (ISO 8601)
    pub timestamp: String,
}

/// Извлекает скоре из строки вида `SKÓRE: 85`, с ограничением 0..=100
fn parse_score(evaluation_text: &str) -> Option<f32> {
    SCORE_LINE
        .captures(evaluation_text)
        .and_then(|caps| caps[1].parse::<f32>().ok())
        .map(|score| score.clamp(0.0, 100.0))
}

/// Оценивает диктант сравнением оригинального и написанного текста
pub async fn evaluate_dictation(
    client: &LlmClient,
    original_text: &str,
    written_text: &str,
) -> Result<Evaluation> {
    let prompt = format!(
        "Jsi učitel českého jazyka. Vyhodnoť prosím tento diktát od žáka.\n\
         \n\
         ORIGINÁLNÍ TEXT (co bylo nadiktováno):\n\
         {original_text}\n\
         \n\
         NAPSANÝ TEXT (co žák napsal):\n\
         {written_text}\n\
         \n\
         Vyhodnoť diktát a poskytni:\n\
         1. Celkové hodnocení (1-2 věty)\n\
         2. Seznam konkrétních chyb (pravopis, interpunkce, chybějící slova)\n\
         3. Pochvalu za to, co bylo správně\n\
         4. Doporučení pro zlepšení\n\
         \n\
         Buď konstruktivní a povzbuzující. Pamatuj, že je to žák základní školy.\n\
         \n\
         Vrať odpověď v následujícím formátu:\n\
         \n\
         HODNOCENÍ: [tvoje celkové hodnocení]\n\
         \n\
         CHYBY:\n\
         - [chyba 1]\n\
         - [chyba 2]\n\
         ...\n\
         \n\
         POCHVALA:\n\
         [co bylo dobře]\n\
         \n\
         DOPORUČENÍ:\n\
         [co zlepšit]\n\
         \n\
         SKÓRE: [číslo 0-100]\n"
    );

    log::info!(
        "Evaluating dictation ({} chars original, {} chars written)",
        original_text.len(),
        written_text.len()
    );

    // низкая температура даёт более консистентную оценку
    let evaluation_text = client
        .chat(serde_json::Value::String(prompt), 0.1, 16384)
        .await
        .map_err(|e| DictationError::Evaluation(e.to_string()))?;

    let score = parse_score(&evaluation_text);
    if score.is_none() {
        log::warn!("Evaluation response contains no parsable score");
    }

    Ok(Evaluation {
        evaluation_text,
        original_text: original_text.to_string(),
        written_text: written_text.to_string(),
        score,
        timestamp: chrono::Local::now().to_rfc3339(),
    })
}
