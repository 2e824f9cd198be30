//! Запуск ffmpeg для операций, не реализуемых чисто в памяти
//! (кодирование MP3 и сохраняющее тон изменение темпа).

use std::path::Path;
use std::process::Command;

use crate::error::{DictationError, Result};

/// Запуск команды FFmpeg
fn run_ffmpeg_command(args: &[&str]) -> Result<()> {
    log::debug!("Running ffmpeg {}", args.join(" "));
    let output = Command::new("ffmpeg")
        .args(args)
        .output()
        .map_err(|e| DictationError::AudioProcessing(format!("Failed to run ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DictationError::AudioProcessing(format!(
            "FFmpeg command failed with status {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}

/// Аргументы кодирования WAV в MP3
///
/// Формат задаётся явно через `-f mp3`: выходной путь может не иметь
/// расширения `.mp3` (например промежуточный staging-файл), а ffmpeg
/// без `-f` выбирает муксер по расширению.
fn mp3_args<'a>(input: &'a str, output: &'a str) -> Vec<&'a str> {
    vec![
        "-i", input, "-codec:a", "libmp3lame", "-qscale:a", "2", "-f", "mp3", "-y", output,
    ]
}

/// Кодирует WAV файл в MP3
pub fn encode_mp3(input_file: &Path, output_file: &Path) -> Result<()> {
    let input = path_str(input_file)?;
    let output = path_str(output_file)?;
    run_ffmpeg_command(&mp3_args(input, output))
}

/// Изменение темпа аудио без изменения высоты тона
///
/// Фильтр atempo принимает коэффициент в диапазоне 0.5..=2.0.
pub fn adjust_audio_tempo(input_file: &Path, tempo_factor: f64, output_file: &Path) -> Result<()> {
    if !(0.5..=2.0).contains(&tempo_factor) {
        return Err(DictationError::Configuration(format!(
            "Tempo factor {} is outside the atempo range 0.5..=2.0",
            tempo_factor
        )));
    }

    let input = path_str(input_file)?;
    let output = path_str(output_file)?;
    let filter_str = format!("atempo={:.2}", tempo_factor);
    let args = vec!["-i", input, "-filter:a", &filter_str, "-y", output];
    run_ffmpeg_command(&args)
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        DictationError::AudioProcessing(format!("Path is not valid UTF-8: {}", path.display()))
    })
}
