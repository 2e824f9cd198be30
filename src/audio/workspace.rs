//! Модуль для работы с временными файлами
//!
//! Рабочая область одной сборки дорожки: временная директория, которая
//! гарантированно удаляется на любом пути выхода, включая ошибку.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::Result;

/// Временная рабочая область одной операции сборки
///
/// Каждый вызов композера получает собственную область; области не
/// разделяются между вызовами.
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    /// Создаёт новую рабочую область
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        Ok(Self { temp_dir })
    }

    /// Путь к директории рабочей области
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Генерирует уникальный путь для промежуточного файла
    pub fn file(&self, prefix: &str, extension: &str) -> PathBuf {
        let file_name = format!("{}_{}.{}", prefix, uuid::Uuid::new_v4(), extension);
        self.temp_dir.path().join(file_name)
    }
}
