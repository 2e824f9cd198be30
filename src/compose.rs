//! Композер аудиодорожки диктанта
//!
//! Превращает список предложений в одну аудиодорожку по выбранному
//! педагогическому протоколу раскладки. Композер владеет разбиением
//! предложений на слова, порядком сегментов и временной рабочей областью;
//! сам синтез речи делегируется [`SpeechSynthesizer`].

use futures::future::try_join_all;

use crate::audio::{PauseKind, SegmentKind, Track, Workspace};
use crate::config::{DictationConfig, LayoutProtocol};
use crate::error::{DictationError, Result};
use crate::text::{join_sentences, tokenize_words};
use crate::tts::SpeechSynthesizer;

/// Композер дорожки диктанта
///
/// Один вызов [`compose_track`](Self::compose_track) независим от других:
/// композер не держит изменяемого состояния между вызовами.
pub struct DictationComposer<'a> {
    synthesizer: &'a dyn SpeechSynthesizer,
    config: &'a DictationConfig,
}

impl<'a> DictationComposer<'a> {
    pub fn new(synthesizer: &'a dyn SpeechSynthesizer, config: &'a DictationConfig) -> Self {
        Self {
            synthesizer,
            config,
        }
    }

    /// Собирает дорожку диктанта для списка предложений
    ///
    /// Предусловия проверяются до первого обращения к синтезатору:
    /// список предложений непуст, `pause_duration >= 0`,
    /// `speed_factor > 0`. Любая ошибка
    /// синтеза прерывает сборку целиком; рабочая область удаляется на
    /// любом пути выхода.
    pub async fn compose_track(
        &self,
        sentences: &[String],
        pause_duration: f64,
        slow: bool,
    ) -> Result<Track> {
        if sentences.is_empty() {
            return Err(DictationError::InvalidArgument(
                "Sentence list must not be empty".to_string(),
            ));
        }
        if pause_duration < 0.0 {
            return Err(DictationError::InvalidArgument(format!(
                "Pause duration must be >= 0, got {}",
                pause_duration
            )));
        }
        if self.config.speed_factor <= 0.0 {
            return Err(DictationError::InvalidArgument(format!(
                "Speed factor must be > 0, got {}",
                self.config.speed_factor
            )));
        }

        let workspace = Workspace::new()?;
        let mut track = Track::new(self.config.sample_rate);

        log::info!(
            "Composing dictation track: {} sentences, protocol {:?}",
            sentences.len(),
            self.config.protocol
        );

        match self.config.protocol {
            LayoutProtocol::WordByWord => {
                self.compose_word_by_word(&mut track, sentences, pause_duration, slow)
                    .await?
            }
            LayoutProtocol::TripleRepeat => {
                self.compose_triple_repeat(&mut track, sentences, pause_duration, slow, &workspace)
                    .await?
            }
        }

        log::info!(
            "Dictation track composed: {} segments, {:.1} s total",
            track.segments().len(),
            track.total_duration().as_secs_f64()
        );

        Ok(track)
    }

    /// Синтез одного фрагмента с контекстом для диагностики
    async fn synth(&self, text: &str, slow: bool) -> Result<crate::audio::AudioClip> {
        self.synthesizer
            .synthesize(text, slow)
            .await
            .map_err(|e| DictationError::synthesis(text, e))
    }

    /// Протокол WordByWord: предложение целиком, по словам, целиком ещё раз
    async fn compose_word_by_word(
        &self,
        track: &mut Track,
        sentences: &[String],
        pause_duration: f64,
        slow: bool,
    ) -> Result<()> {
        for (i, sentence) in sentences.iter().enumerate() {
            log::info!("Synthesizing sentence {}/{}", i + 1, sentences.len());
            let sentence_clip = self.synth(sentence, slow).await?;

            track.append(SegmentKind::Sentence(i), sentence_clip.clone())?;
            track.append_pause(PauseKind::Short, self.config.short_pause_secs);

            // слова синтезируются параллельно, но собираются строго
            // в порядке следования, а не в порядке завершения
            let words = tokenize_words(sentence);
            let word_clips =
                try_join_all(words.iter().map(|word| self.synth(word, slow))).await?;

            let word_count = word_clips.len();
            for (j, word_clip) in word_clips.into_iter().enumerate() {
                track.append(SegmentKind::Word { sentence: i, word: j }, word_clip)?;
                if j + 1 < word_count {
                    track.append_pause(PauseKind::Word, self.config.word_pause_secs);
                }
            }

            track.append_pause(PauseKind::Short, self.config.short_pause_secs);

            // повторное чтение использует уже синтезированный клип:
            // оба прочтения гарантированно звучат одинаково
            track.append(SegmentKind::Sentence(i), sentence_clip)?;

            if i + 1 < sentences.len() {
                track.append_pause(PauseKind::Long, pause_duration);
            }
        }

        Ok(())
    }

    /// Протокол TripleRepeat: превью, каждое предложение трижды, полный повтор
    async fn compose_triple_repeat(
        &self,
        track: &mut Track,
        sentences: &[String],
        pause_duration: f64,
        slow: bool,
        workspace: &Workspace,
    ) -> Result<()> {
        let tempo = self.config.tempo.strategy();
        let factor = self.config.speed_factor;
        let joined = join_sentences(sentences);

        let preview = self.synth(&joined, slow).await?;
        let preview = tempo.adjust(&preview, factor, workspace)?;
        track.append(SegmentKind::Preview, preview)?;
        track.append_pause(PauseKind::Transition, self.config.transition_pause_secs);

        for (i, sentence) in sentences.iter().enumerate() {
            log::info!("Synthesizing sentence {}/{}", i + 1, sentences.len());
            let clip = self.synth(sentence, slow).await?;
            let clip = tempo.adjust(&clip, factor, workspace)?;

            for repeat in 0..3 {
                track.append(SegmentKind::Sentence(i), clip.clone())?;
                if repeat < 2 {
                    track.append_pause(PauseKind::Long, pause_duration);
                }
            }

            if i + 1 < sentences.len() {
                track.append_pause(PauseKind::Transition, self.config.transition_pause_secs);
            }
        }

        track.append_pause(PauseKind::Transition, self.config.transition_pause_secs);

        // полный повтор синтезируется заново, клип превью не переиспользуется
        let recap = self.synth(&joined, slow).await?;
        let recap = tempo.adjust(&recap, factor, workspace)?;
        track.append(SegmentKind::Recap, recap)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioClip;
    use crate::config::TempoMode;
    use std::sync::Mutex;
    use std::time::Duration;

    const RATE: u32 = 24000;
    // детерминированная длительность клипа: 10 мс на символ текста
    const SAMPLES_PER_CHAR: usize = 240;

    struct StubSynthesizer {
        calls: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl StubSynthesizer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(fragment: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(fragment.to_string()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SpeechSynthesizer for StubSynthesizer {
        async fn synthesize(&self, text: &str, _slow: bool) -> Result<AudioClip> {
            self.calls.lock().unwrap().push(text.to_string());
            if self.fail_on.as_deref() == Some(text) {
                return Err(DictationError::Tts("injected failure".to_string()));
            }
            let samples = vec![0.1; text.chars().count() * SAMPLES_PER_CHAR];
            Ok(AudioClip::from_samples(samples, RATE))
        }
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sentences() -> Vec<String> {
        vec!["Pes běhá.".to_string(), "Kočka spí.".to_string()]
    }

    fn config(protocol: LayoutProtocol) -> DictationConfig {
        DictationConfig {
            protocol,
            sample_rate: RATE,
            ..DictationConfig::default()
        }
    }

    #[tokio::test]
    async fn word_by_word_produces_expected_segment_sequence() {
        init_logging();
        let stub = StubSynthesizer::new();
        let config = config(LayoutProtocol::WordByWord);
        let composer = DictationComposer::new(&stub, &config);

        let track = composer.compose_track(&sentences(), 5.0, true).await.unwrap();

        use SegmentKind::*;
        assert_eq!(
            track.segment_kinds(),
            vec![
                Sentence(0),
                Pause(PauseKind::Short),
                Word { sentence: 0, word: 0 },
                Pause(PauseKind::Word),
                Word { sentence: 0, word: 1 },
                Pause(PauseKind::Short),
                Sentence(0),
                Pause(PauseKind::Long),
                Sentence(1),
                Pause(PauseKind::Short),
                Word { sentence: 1, word: 0 },
                Pause(PauseKind::Word),
                Word { sentence: 1, word: 1 },
                Pause(PauseKind::Short),
                Sentence(1),
            ]
        );

        // длинная пауза ровно одна и ровно 5 секунд, без хвостовой паузы
        let durations = track.segment_durations();
        assert_eq!(durations[7], Duration::from_secs(5));
        assert!(!matches!(track.segment_kinds().last(), Some(Pause(_))));
    }

    #[tokio::test]
    async fn word_by_word_reuses_sentence_clip() {
        let stub = StubSynthesizer::new();
        let config = config(LayoutProtocol::WordByWord);
        let composer = DictationComposer::new(&stub, &config);

        composer.compose_track(&sentences(), 5.0, true).await.unwrap();

        let calls = stub.calls();
        // каждое предложение синтезировано ровно один раз, повтор — из кэша клипа
        assert_eq!(calls.iter().filter(|c| *c == "Pes běhá.").count(), 1);
        assert_eq!(calls.iter().filter(|c| *c == "Kočka spí.").count(), 1);
        assert_eq!(calls.len(), 6); // 2 предложения + 4 слова
    }

    #[tokio::test]
    async fn total_duration_equals_sum_of_segment_durations() {
        let stub = StubSynthesizer::new();
        let config = config(LayoutProtocol::WordByWord);
        let composer = DictationComposer::new(&stub, &config);

        let track = composer.compose_track(&sentences(), 5.0, true).await.unwrap();

        let sum: Duration = track.segment_durations().iter().sum();
        assert_eq!(track.total_duration(), sum);
    }

    #[tokio::test]
    async fn composition_is_deterministic_across_runs() {
        let config = config(LayoutProtocol::WordByWord);

        let stub_a = StubSynthesizer::new();
        let track_a = DictationComposer::new(&stub_a, &config)
            .compose_track(&sentences(), 5.0, true)
            .await
            .unwrap();

        let stub_b = StubSynthesizer::new();
        let track_b = DictationComposer::new(&stub_b, &config)
            .compose_track(&sentences(), 5.0, true)
            .await
            .unwrap();

        assert_eq!(track_a.segment_kinds(), track_b.segment_kinds());
        assert_eq!(track_a.segment_durations(), track_b.segment_durations());
        assert_eq!(track_a.total_duration(), track_b.total_duration());
    }

    #[tokio::test]
    async fn synthesis_failure_aborts_whole_composition() {
        init_logging();
        // отказ на втором слове первого предложения
        let stub = StubSynthesizer::failing_on("běhá");
        let config = config(LayoutProtocol::WordByWord);
        let composer = DictationComposer::new(&stub, &config);

        let result = composer.compose_track(&sentences(), 5.0, true).await;

        match result {
            Err(DictationError::Synthesis { fragment, .. }) => assert_eq!(fragment, "běhá"),
            other => panic!("expected Synthesis error, got {:?}", other),
        }
        // второе предложение не синтезировалось: сборка прервана целиком
        assert!(!stub.calls().contains(&"Kočka spí.".to_string()));
    }

    #[tokio::test]
    async fn negative_pause_is_rejected_before_any_synthesis() {
        let stub = StubSynthesizer::new();
        let config = config(LayoutProtocol::WordByWord);
        let composer = DictationComposer::new(&stub, &config);

        let result = composer.compose_track(&sentences(), -1.0, true).await;

        assert!(matches!(result, Err(DictationError::InvalidArgument(_))));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn non_positive_speed_factor_is_rejected_before_any_synthesis() {
        let stub = StubSynthesizer::new();
        let config = DictationConfig {
            protocol: LayoutProtocol::TripleRepeat,
            speed_factor: 0.0,
            sample_rate: RATE,
            ..DictationConfig::default()
        };
        let composer = DictationComposer::new(&stub, &config);

        let result = composer.compose_track(&sentences(), 5.0, true).await;

        assert!(matches!(result, Err(DictationError::InvalidArgument(_))));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_sentence_list_is_rejected() {
        let stub = StubSynthesizer::new();
        let config = config(LayoutProtocol::WordByWord);
        let composer = DictationComposer::new(&stub, &config);

        let result = composer.compose_track(&[], 5.0, true).await;

        assert!(matches!(result, Err(DictationError::InvalidArgument(_))));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn punctuation_only_sentence_yields_no_word_segments() {
        let stub = StubSynthesizer::new();
        let config = config(LayoutProtocol::WordByWord);
        let composer = DictationComposer::new(&stub, &config);

        let input = vec!["??".to_string()];
        let track = composer.compose_track(&input, 5.0, true).await.unwrap();

        use SegmentKind::*;
        assert_eq!(
            track.segment_kinds(),
            vec![Sentence(0), Pause(PauseKind::Short), Pause(PauseKind::Short), Sentence(0)]
        );
    }

    #[tokio::test]
    async fn triple_repeat_produces_expected_segment_sequence() {
        init_logging();
        let stub = StubSynthesizer::new();
        let config = config(LayoutProtocol::TripleRepeat);
        let composer = DictationComposer::new(&stub, &config);

        let track = composer.compose_track(&sentences(), 4.0, true).await.unwrap();

        use SegmentKind::*;
        assert_eq!(
            track.segment_kinds(),
            vec![
                Preview,
                Pause(PauseKind::Transition),
                Sentence(0),
                Pause(PauseKind::Long),
                Sentence(0),
                Pause(PauseKind::Long),
                Sentence(0),
                Pause(PauseKind::Transition),
                Sentence(1),
                Pause(PauseKind::Long),
                Sentence(1),
                Pause(PauseKind::Long),
                Sentence(1),
                Pause(PauseKind::Transition),
                Recap,
            ]
        );

        // превью и полный повтор — отдельные вызовы синтеза одного текста
        let calls = stub.calls();
        let joined = "Pes běhá. Kočka spí.".to_string();
        assert_eq!(calls.iter().filter(|c| **c == joined).count(), 2);
        assert_eq!(calls.len(), 4);
    }

    #[tokio::test]
    async fn triple_repeat_applies_speed_factor() {
        let stub = StubSynthesizer::new();
        let config = DictationConfig {
            protocol: LayoutProtocol::TripleRepeat,
            tempo: TempoMode::ResampleReinterpret,
            speed_factor: 0.5,
            sample_rate: RATE,
            ..DictationConfig::default()
        };
        let composer = DictationComposer::new(&stub, &config);

        let track = composer.compose_track(&sentences(), 4.0, true).await.unwrap();

        // фактор 0.5 удваивает длительность превью
        let joined_chars = "Pes běhá. Kočka spí.".chars().count();
        let expected = Duration::from_secs_f64(
            (joined_chars * SAMPLES_PER_CHAR * 2) as f64 / RATE as f64,
        );
        assert_eq!(track.segment_durations()[0], expected);
    }
}
