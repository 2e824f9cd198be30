//! Модуль обработки текста диктанта

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINE_NUMBERING: Regex = Regex::new(r"^\s*\d+\s*[.)]\s*").unwrap();
}

/// Разбивает предложение на слова для пословного диктования.
///
/// Знаки `.`, `,`, `!`, `?` удаляются из всей строки (включая внутренние
/// вхождения), остаток делится по пробельным символам. Для строки из одних
/// знаков препинания возвращается пустой список.
pub fn tokenize_words(sentence: &str) -> Vec<String> {
    let stripped: String = sentence
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '!' | '?'))
        .collect();

    stripped
        .split_whitespace()
        .map(|w| w.to_string())
        .collect()
}

/// Подготавливает строки ответа LLM к использованию как предложения диктанта:
/// убирает пустые строки, обрезает пробелы и отбрасывает нумерацию списка.
pub fn clean_generated_sentences(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| LINE_NUMBERING.replace(line.trim(), "").to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Соединяет предложения в один текст одиночными пробелами
pub fn join_sentences(sentences: &[String]) -> String {
    sentences.join(" ")
}
