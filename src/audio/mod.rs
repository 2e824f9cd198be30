//! Модуль для работы с аудио
//!
//! Содержит значение [`AudioClip`] (моно PCM), декодирование через symphonia,
//! выравнивание частоты дискретизации через rubato, сборку дорожки и
//! стратегии изменения темпа.

pub mod ffmpeg;
pub mod tempo;
pub mod track;
pub mod workspace;

pub use tempo::TempoStrategy;
pub use track::{PauseKind, Segment, SegmentKind, Track};
pub use workspace::Workspace;

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::probe::Hint;

use crate::error::{DictationError, Result};

/// Аудиоклип: моно PCM, 32-bit float
///
/// Клип неизменяем после создания; дорожка собирается только конкатенацией.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioClip {
    /// Создаёт клип из готовых сэмплов
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Создаёт клип тишины заданной длительности
    pub fn silence(duration: Duration, sample_rate: u32) -> Self {
        let len = (duration.as_secs_f64() * sample_rate as f64).round() as usize;
        Self {
            samples: vec![0.0; len],
            sample_rate,
        }
    }

    /// Декодирует клип из закодированных байтов (MP3/WAV)
    pub fn decode(data: Vec<u8>) -> Result<Self> {
        decode_source(Box::new(Cursor::new(data)))
    }

    /// Декодирует клип из файла
    pub fn decode_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        decode_source(Box::new(file))
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Длительность клипа
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Возвращает клип, приведённый к указанной частоте дискретизации
    pub fn resampled(&self, target_rate: u32) -> Result<Self> {
        if self.sample_rate == target_rate {
            return Ok(self.clone());
        }

        use rubato::{FftFixedIn, Resampler};

        const CHUNK: usize = 1024;
        const SUB_CHUNKS: usize = 2;

        let mut resampler = FftFixedIn::<f32>::new(
            self.sample_rate as usize,
            target_rate as usize,
            CHUNK,
            SUB_CHUNKS,
            1,
        )
        .map_err(|e| DictationError::AudioProcessing(format!("Failed to create resampler: {}", e)))?;

        let expected_len =
            (self.samples.len() as f64 * target_rate as f64 / self.sample_rate as f64).round()
                as usize;
        let mut out = Vec::with_capacity(expected_len + CHUNK);

        let mut pos = 0;
        while pos < self.samples.len() {
            let end = (pos + CHUNK).min(self.samples.len());
            let mut input_chunk = vec![0.0; CHUNK];
            input_chunk[..end - pos].copy_from_slice(&self.samples[pos..end]);

            let block = vec![input_chunk];
            let frames = resampler
                .process(&block, None)
                .map_err(|e| DictationError::AudioProcessing(format!("Resampling failed: {}", e)))?;
            out.extend_from_slice(&frames[0]);

            pos = end;
        }

        // последний чанк дополняется нулями, обрезаем до расчётной длины
        out.truncate(expected_len);

        Ok(Self {
            samples: out,
            sample_rate: target_rate,
        })
    }
}

/// Записывает последовательность PCM блоков в 16-битный моно WAV файл
pub(crate) fn write_wav_chunks<'a>(
    path: &Path,
    sample_rate: u32,
    chunks: impl Iterator<Item = &'a [f32]>,
) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| DictationError::AudioProcessing(format!("Failed to create WAV: {}", e)))?;

    for chunk in chunks {
        for sample in chunk {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(value).map_err(|e| {
                DictationError::AudioProcessing(format!("Failed to write WAV: {}", e))
            })?;
        }
    }

    writer
        .finalize()
        .map_err(|e| DictationError::AudioProcessing(format!("Failed to finalize WAV: {}", e)))
}

fn conv<T>(samples: &mut Vec<f32>, data: std::borrow::Cow<symphonia::core::audio::AudioBuffer<T>>)
where
    T: symphonia::core::sample::Sample,
    f32: FromSample<T>,
{
    samples.extend(data.chan(0).iter().map(|v| f32::from_sample(*v)))
}

/// Декодирует первый аудиотрек источника в моно PCM
fn decode_source(source: Box<dyn MediaSource>) -> Result<AudioClip> {
    let mss = MediaSourceStream::new(source, Default::default());
    let hint = Hint::new();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &Default::default(), &Default::default())
        .map_err(|e| DictationError::AudioDecoding(format!("Unsupported audio container: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| {
            DictationError::AudioDecoding("No supported audio tracks found in input".to_string())
        })?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DictationError::AudioDecoding(format!("Unsupported codec: {}", e)))?;
    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.ok_or_else(|| {
        DictationError::AudioDecoding("Audio track has no sample rate".to_string())
    })?;

    let mut pcm_data = Vec::new();
    while let Ok(packet) = format.next_packet() {
        while !format.metadata().is_latest() {
            format.metadata().pop();
        }
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = decoder
            .decode(&packet)
            .map_err(|e| DictationError::AudioDecoding(format!("Decode failed: {}", e)))?;
        match decoded {
            AudioBufferRef::F32(buf) => pcm_data.extend(buf.chan(0)),
            AudioBufferRef::U8(data) => conv(&mut pcm_data, data),
            AudioBufferRef::U16(data) => conv(&mut pcm_data, data),
            AudioBufferRef::U24(data) => conv(&mut pcm_data, data),
            AudioBufferRef::U32(data) => conv(&mut pcm_data, data),
            AudioBufferRef::S8(data) => conv(&mut pcm_data, data),
            AudioBufferRef::S16(data) => conv(&mut pcm_data, data),
            AudioBufferRef::S24(data) => conv(&mut pcm_data, data),
            AudioBufferRef::S32(data) => conv(&mut pcm_data, data),
            AudioBufferRef::F64(data) => conv(&mut pcm_data, data),
        }
    }

    if pcm_data.is_empty() {
        return Err(DictationError::AudioDecoding(
            "Decoded audio contains no samples".to_string(),
        ));
    }

    Ok(AudioClip::from_samples(pcm_data, sample_rate))
}
