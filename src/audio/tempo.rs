//! Стратегии изменения темпа воспроизведения
//!
//! Две реализации с разными компромиссами. Наивная стратегия — это
//! переинтерпретация частоты дискретизации (как смена frame rate в pydub):
//! она меняет высоту тона и это задокументированное свойство, а не скрытый
//! дефект. Стратегия atempo сохраняет тон, но требует ffmpeg и не даёт
//! бит-в-бит совместимого с наивной стратегией результата.

use crate::audio::{ffmpeg, workspace::Workspace, AudioClip};
use crate::config::TempoMode;
use crate::error::{DictationError, Result};

/// Стратегия изменения темпа клипа
///
/// `factor < 1.0` замедляет воспроизведение. Коэффициент 1.0 — no-op.
pub trait TempoStrategy: Send + Sync {
    fn adjust(&self, clip: &AudioClip, factor: f64, workspace: &Workspace) -> Result<AudioClip>;
}

const FACTOR_EPSILON: f64 = 1e-9;

/// Наивная переинтерпретация частоты дискретизации
///
/// Сэмплы передискретизируются линейной интерполяцией с шагом `factor`,
/// после чего клипу возвращается номинальная частота. Длительность
/// масштабируется в 1/factor раз, высота тона смещается пропорционально.
pub struct ResampleReinterpret;

impl TempoStrategy for ResampleReinterpret {
    fn adjust(&self, clip: &AudioClip, factor: f64, _workspace: &Workspace) -> Result<AudioClip> {
        if factor <= 0.0 {
            return Err(DictationError::InvalidArgument(format!(
                "Speed factor must be > 0, got {}",
                factor
            )));
        }
        if (factor - 1.0).abs() < FACTOR_EPSILON {
            return Ok(clip.clone());
        }

        let samples = clip.samples();
        let new_len = (samples.len() as f64 / factor).round() as usize;
        let mut out = Vec::with_capacity(new_len);
        for i in 0..new_len {
            let pos = i as f64 * factor;
            let idx = pos as usize;
            let frac = (pos - idx as f64) as f32;
            let a = samples.get(idx).copied().unwrap_or(0.0);
            let b = samples.get(idx + 1).copied().unwrap_or(a);
            out.push(a + (b - a) * frac);
        }

        Ok(AudioClip::from_samples(out, clip.sample_rate()))
    }
}

/// Сохраняющее высоту тона изменение темпа через ffmpeg atempo
pub struct FfmpegAtempo;

impl TempoStrategy for FfmpegAtempo {
    fn adjust(&self, clip: &AudioClip, factor: f64, workspace: &Workspace) -> Result<AudioClip> {
        if (factor - 1.0).abs() < FACTOR_EPSILON {
            return Ok(clip.clone());
        }

        let input_path = workspace.file("tempo_in", "wav");
        let output_path = workspace.file("tempo_out", "wav");

        crate::audio::write_wav_chunks(
            &input_path,
            clip.sample_rate(),
            std::iter::once(clip.samples()),
        )?;
        ffmpeg::adjust_audio_tempo(&input_path, factor, &output_path)?;
        let adjusted = AudioClip::decode_file(&output_path)?;

        // промежуточные файлы убираются сразу, не дожидаясь Drop рабочей области
        let _ = std::fs::remove_file(&input_path);
        let _ = std::fs::remove_file(&output_path);

        Ok(adjusted)
    }
}

impl TempoMode {
    /// Реализация стратегии для данного режима
    pub fn strategy(&self) -> &'static dyn TempoStrategy {
        match self {
            TempoMode::ResampleReinterpret => &ResampleReinterpret,
            TempoMode::FfmpegAtempo => &FfmpegAtempo,
        }
    }
}
