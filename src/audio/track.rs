//! Сборка итоговой аудиодорожки диктанта
//!
//! Дорожка растёт только добавлением сегментов в конец; порядок сегментов
//! детерминирован раскладкой и не зависит от порядка завершения синтеза.
//! Общая длительность дорожки равна сумме длительностей её сегментов.

use std::path::Path;
use std::time::Duration;

use crate::audio::{ffmpeg, workspace::Workspace, AudioClip};
use crate::config::AudioFormat;
use crate::error::{DictationError, Result};

/// Вид паузы в раскладке диктанта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseKind {
    /// Короткая пауза между фазами одного предложения
    Short,
    /// Пауза между словами
    Word,
    /// Длинная пауза между предложениями (или повторами)
    Long,
    /// Переходная пауза протокола TripleRepeat
    Transition,
}

/// Вид сегмента дорожки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Целое предложение с данным индексом
    Sentence(usize),
    /// Отдельное слово предложения
    Word { sentence: usize, word: usize },
    /// Превью всего текста (TripleRepeat)
    Preview,
    /// Полный повтор всего текста в конце (TripleRepeat)
    Recap,
    /// Тишина
    Pause(PauseKind),
}

/// Один сегмент дорожки: вид плюс аудиоданные
#[derive(Debug, Clone)]
pub struct Segment {
    pub kind: SegmentKind,
    pub clip: AudioClip,
}

/// Итоговая аудиодорожка одного диктанта
#[derive(Debug, Clone)]
pub struct Track {
    sample_rate: u32,
    segments: Vec<Segment>,
}

impl Track {
    /// Создаёт пустую дорожку с заданной частотой дискретизации
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            segments: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Добавляет клип в конец дорожки, при необходимости выравнивая частоту
    pub fn append(&mut self, kind: SegmentKind, clip: AudioClip) -> Result<()> {
        let clip = clip.resampled(self.sample_rate)?;
        self.segments.push(Segment { kind, clip });
        Ok(())
    }

    /// Добавляет паузу заданной длительности
    pub fn append_pause(&mut self, kind: PauseKind, duration_secs: f64) {
        let clip = AudioClip::silence(Duration::from_secs_f64(duration_secs), self.sample_rate);
        self.segments.push(Segment {
            kind: SegmentKind::Pause(kind),
            clip,
        });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Последовательность видов сегментов
    pub fn segment_kinds(&self) -> Vec<SegmentKind> {
        self.segments.iter().map(|s| s.kind).collect()
    }

    /// Последовательность длительностей сегментов
    pub fn segment_durations(&self) -> Vec<Duration> {
        self.segments.iter().map(|s| s.clip.duration()).collect()
    }

    /// Общая длительность дорожки
    pub fn total_duration(&self) -> Duration {
        self.segments.iter().map(|s| s.clip.duration()).sum()
    }

    /// Экспортирует дорожку в один закодированный файл
    ///
    /// Запись идёт в соседний временный файл с переименованием в конце,
    /// поэтому при ошибке по целевому пути не остаётся частичного файла.
    pub fn export(&self, path: &Path, format: AudioFormat) -> Result<()> {
        if self.segments.is_empty() {
            return Err(DictationError::InvalidArgument(
                "Cannot export an empty track".to_string(),
            ));
        }

        let file_name = path
            .file_name()
            .ok_or_else(|| {
                DictationError::InvalidArgument(format!(
                    "Output path has no file name: {}",
                    path.display()
                ))
            })?
            .to_string_lossy();
        // staging-файл несёт расширение формата, чтобы внешние кодеры
        // могли определить контейнер и по имени
        let staging =
            path.with_file_name(format!(".{}.part.{}", file_name, format.extension()));

        let result = match format {
            AudioFormat::Wav => self.write_wav(&staging),
            AudioFormat::Mp3 => {
                let workspace = Workspace::new()?;
                let wav_path = workspace.file("track", "wav");
                self.write_wav(&wav_path)
                    .and_then(|_| ffmpeg::encode_mp3(&wav_path, &staging))
            }
        };

        if let Err(e) = result {
            let _ = std::fs::remove_file(&staging);
            return Err(e);
        }

        if let Err(e) = std::fs::rename(&staging, path) {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }

        log::info!(
            "Exported dictation track ({:.1} s, {} segments) to {}",
            self.total_duration().as_secs_f64(),
            self.segments.len(),
            path.display()
        );
        Ok(())
    }

    fn write_wav(&self, path: &Path) -> Result<()> {
        crate::audio::write_wav_chunks(
            path,
            self.sample_rate,
            self.segments.iter().map(|s| s.clip.samples()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(secs: f64) -> AudioClip {
        AudioClip::silence(Duration::from_secs_f64(secs), 24000)
    }

    #[test]
    fn total_duration_equals_sum_of_segments() {
        let mut track = Track::new(24000);
        track.append(SegmentKind::Sentence(0), clip(1.5)).unwrap();
        track.append_pause(PauseKind::Short, 2.0);
        track
            .append(SegmentKind::Word { sentence: 0, word: 0 }, clip(0.5))
            .unwrap();

        let sum: Duration = track.segment_durations().iter().sum();
        assert_eq!(track.total_duration(), sum);
        assert_eq!(track.total_duration(), Duration::from_secs(4));
    }

    #[test]
    fn append_resamples_foreign_rate() {
        let mut track = Track::new(24000);
        let foreign = AudioClip::silence(Duration::from_secs(1), 48000);
        track.append(SegmentKind::Sentence(0), foreign).unwrap();
        assert_eq!(track.segments()[0].clip.sample_rate(), 24000);
    }

    #[test]
    fn export_empty_track_is_rejected() {
        let track = Track::new(24000);
        let dir = tempfile::tempdir().unwrap();
        let result = track.export(&dir.path().join("out.wav"), AudioFormat::Wav);
        assert!(matches!(result, Err(DictationError::InvalidArgument(_))));
    }

    #[test]
    fn export_wav_writes_file_and_no_staging_remains() {
        let mut track = Track::new(24000);
        track.append(SegmentKind::Sentence(0), clip(1.0)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dictation.wav");
        track.export(&out, AudioFormat::Wav).unwrap();

        assert!(out.exists());
        assert!(!dir.path().join(".dictation.wav.part.wav").exists());

        let decoded = AudioClip::decode_file(&out).unwrap();
        assert_eq!(decoded.samples().len(), 24000);
    }

    fn ffmpeg_available() -> bool {
        std::process::Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn export_mp3_writes_decodable_file() {
        if !ffmpeg_available() {
            eprintln!("skipping: ffmpeg not found in PATH");
            return;
        }

        let mut track = Track::new(24000);
        track.append(SegmentKind::Sentence(0), clip(1.0)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dictation.mp3");
        track.export(&out, AudioFormat::Mp3).unwrap();

        assert!(out.exists());
        assert!(!dir.path().join(".dictation.mp3.part.mp3").exists());

        let decoded = AudioClip::decode_file(&out).unwrap();
        assert!(!decoded.samples().is_empty());
    }

    #[test]
    fn export_to_unwritable_path_fails_without_partial_file() {
        let mut track = Track::new(24000);
        track.append(SegmentKind::Sentence(0), clip(0.1)).unwrap();

        let missing = Path::new("/nonexistent-dir/dictation.wav");
        assert!(track.export(missing, AudioFormat::Wav).is_err());
        assert!(!missing.exists());
    }
}
