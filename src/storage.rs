//! Сохранение диктантов и оценок в JSON файлы
//!
//! Имена файлов несут временную метку; директории создаются по требованию.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::llm::evaluator::Evaluation;
use crate::llm::generator::GeneratedDictation;

/// Сохраняет сгенерированный диктант, возвращает путь к файлу
pub fn save_dictation(dictation: &GeneratedDictation, data_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("dictation_grade{}_{}.json", dictation.grade, timestamp);
    let path = data_dir.join(filename);

    std::fs::write(&path, serde_json::to_string_pretty(dictation)?)?;
    log::info!("Saved dictation to {}", path.display());

    Ok(path)
}

/// Сохраняет оценку диктанта, возвращает путь к файлу
pub fn save_evaluation(evaluation: &Evaluation, data_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("evaluation_{}.json", timestamp);
    let path = data_dir.join(filename);

    std::fs::write(&path, serde_json::to_string_pretty(evaluation)?)?;
    log::info!("Saved evaluation to {}", path.display());

    Ok(path)
}
