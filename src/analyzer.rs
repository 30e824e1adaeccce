//! Analysis orchestration and the assembled output record.
//!
//! [`Analyzer`] holds the externally-owned model handles (loaded once at
//! process start, injected at construction) and drives the scorers in
//! dependency order. Every scorer degrades gracefully: a report with
//! some fields at their documented defaults is preferred over no report,
//! and only a total inability to obtain features surfaces as an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::age::{self, AgeFeatures, Gender};
use crate::config::AnalyzerConfig;
use crate::features::round2;
use crate::health::{self, VocalHealthResult};
use crate::personality::{self, TraitScores};
use crate::providers::{
    filter_trigger_words, AudioClassifier, ExtractionError, FeatureExtractor, Prediction,
};
use crate::stress::{self, StressLevel};
use crate::suggestions;
use crate::timeline::{self, SegmentObservation, TimelinePoint};

/// Errors that surface to the caller. Per-component failures never
/// appear here; they are recovered via documented default records.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("audio clip is empty")]
    EmptyClip,

    #[error(transparent)]
    FeatureExtraction(#[from] ExtractionError),
}

/// Primary emotion diagnostics for the clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionDiagnostics {
    pub emotion: String,
    /// Top prediction confidence in [0, 100].
    pub confidence: f64,
    /// Top predictions, classifier order preserved.
    pub all_emotions: Vec<Prediction>,
}

impl EmotionDiagnostics {
    fn from_predictions(predictions: Vec<Prediction>, keep: usize) -> Self {
        let top = &predictions[0];
        Self {
            emotion: top.label.clone(),
            confidence: round2(top.score),
            all_emotions: predictions.iter().take(keep).cloned().collect(),
        }
    }

    /// Documented classification-failure fallback.
    fn fallback() -> Self {
        Self {
            emotion: "neutral".to_string(),
            confidence: 0.0,
            all_emotions: Vec::new(),
        }
    }
}

/// Heatmap-ready view of the emotion timeline: parallel arrays of
/// segment start labels and emotions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heatmap {
    pub times: Vec<String>,
    pub emotions: Vec<String>,
}

impl Heatmap {
    fn from_series(series: &[TimelinePoint]) -> Self {
        Self {
            times: series.iter().map(|p| p.time.clone()).collect(),
            emotions: series.iter().map(|p| p.emotion.clone()).collect(),
        }
    }
}

/// Completion metadata attached to the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveAnalysis {
    pub status: String,
    /// Clip duration in seconds, 2 decimals.
    pub duration: f64,
    /// "good" when the health score clears 70, otherwise
    /// "needs improvement".
    pub quality: String,
}

/// Unrounded sub-results kept for downstream inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDiagnostics {
    pub emotion: EmotionDiagnostics,
    pub health: VocalHealthResult,
}

/// The full analysis report for one clip. Constructed fresh per input,
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub vocal_health_score: f64,
    pub emotion: String,
    pub stress_level: f64,
    pub stress_level_category: StressLevel,
    pub stress_components: BTreeMap<String, f64>,
    pub timeline_emotion: String,
    pub emotion_timeline: Vec<TimelinePoint>,
    pub emotion_distribution: BTreeMap<String, u32>,
    pub issues_detected: Vec<String>,
    pub early_illness_signals: Vec<String>,
    pub personality_analysis: TraitScores,
    pub personality_confidence: f64,
    pub voice_age: u32,
    pub age_confidence: f64,
    pub detected_gender: Gender,
    pub age_features: AgeFeatures,
    pub trigger_word_alert: Vec<String>,
    pub suggestions: Vec<String>,
    pub heatmap: Heatmap,
    pub live_analysis: LiveAnalysis,
    pub raw: RawDiagnostics,
}

/// Orchestrates feature extraction, classification and scoring into one
/// [`AnalysisResult`].
pub struct Analyzer<X, E, K> {
    extractor: X,
    emotion_model: E,
    keyword_model: K,
    config: AnalyzerConfig,
}

impl<X, E, K> Analyzer<X, E, K>
where
    X: FeatureExtractor,
    E: AudioClassifier,
    K: AudioClassifier,
{
    pub fn new(extractor: X, emotion_model: E, keyword_model: K) -> Self {
        Self::with_config(extractor, emotion_model, keyword_model, AnalyzerConfig::default())
    }

    pub fn with_config(
        extractor: X,
        emotion_model: E,
        keyword_model: K,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            extractor,
            emotion_model,
            keyword_model,
            config,
        }
    }

    /// Analyze one clip of 16 kHz-style mono samples.
    ///
    /// Only a total input failure (empty clip, extraction failure)
    /// returns an error; every sub-analysis failure is recovered with
    /// that component's documented default.
    pub fn analyze(&self, samples: &[f32], sample_rate: u32) -> Result<AnalysisResult, AnalysisError> {
        if samples.is_empty() || sample_rate == 0 {
            return Err(AnalysisError::EmptyClip);
        }
        let duration = samples.len() as f64 / f64::from(sample_rate);
        info!(duration_seconds = duration, "starting voice analysis");

        let features = self.extractor.extract(samples, sample_rate)?;

        let emotion = match self.emotion_model.classify(samples, sample_rate) {
            Ok(predictions) if !predictions.is_empty() => {
                EmotionDiagnostics::from_predictions(predictions, self.config.emotion_diagnostics)
            }
            Ok(_) => {
                warn!("emotion classifier returned no predictions, using neutral fallback");
                EmotionDiagnostics::fallback()
            }
            Err(err) => {
                warn!(error = %err, "emotion classification failed, using neutral fallback");
                EmotionDiagnostics::fallback()
            }
        };

        let health = health::score(&features);
        let stress = stress::estimate(&emotion.emotion, &health);
        let age = age::estimate(&features);
        let personality = personality::profile(&features);
        let timeline = self.classify_timeline(samples, sample_rate, duration);

        let trigger_word_alert = match self.keyword_model.classify(samples, sample_rate) {
            Ok(predictions) => filter_trigger_words(
                &predictions,
                self.config.trigger_score_threshold,
                self.config.max_trigger_words,
            ),
            Err(err) => {
                warn!(error = %err, "keyword classification failed, no trigger words");
                Vec::new()
            }
        };

        let suggestions = suggestions::generate(&health, &stress, &emotion.emotion);

        let quality = if health.score > 70.0 {
            "good"
        } else {
            "needs improvement"
        };

        info!(
            health = health.score,
            stress = stress.score,
            emotion = %emotion.emotion,
            "voice analysis complete"
        );

        Ok(AnalysisResult {
            vocal_health_score: health.score,
            emotion: emotion.emotion.clone(),
            stress_level: stress.score,
            stress_level_category: stress.level,
            stress_components: stress.components,
            timeline_emotion: timeline.dominant_emotion,
            emotion_timeline: timeline.series.clone(),
            emotion_distribution: timeline.distribution,
            issues_detected: health.issues.clone(),
            early_illness_signals: health.illness_signals.clone(),
            personality_analysis: personality.traits,
            personality_confidence: personality.confidence,
            voice_age: age.age,
            age_confidence: age.confidence,
            detected_gender: age.gender,
            age_features: age.features,
            trigger_word_alert,
            suggestions,
            heatmap: Heatmap::from_series(&timeline.series),
            live_analysis: LiveAnalysis {
                status: "completed".to_string(),
                duration: round2(duration),
                quality: quality.to_string(),
            },
            raw: RawDiagnostics {
                emotion,
                health,
            },
        })
    }

    /// Classify each timeline segment and aggregate. Segment buffers are
    /// plain subslices, created and dropped here before aggregation.
    fn classify_timeline(
        &self,
        samples: &[f32],
        sample_rate: u32,
        duration: f64,
    ) -> timeline::TimelineResult {
        let count = timeline::segment_count(duration);
        let segment_len = samples.len() / count;
        let mut segments = Vec::with_capacity(count);

        for i in 0..count {
            let start = i * segment_len;
            let end = if i + 1 == count {
                samples.len()
            } else {
                start + segment_len
            };
            let time_offset_seconds = start as f64 / f64::from(sample_rate);

            let prediction = match self.emotion_model.classify(&samples[start..end], sample_rate) {
                Ok(predictions) => predictions.into_iter().next(),
                Err(err) => {
                    debug!(segment = i, error = %err, "segment classification failed");
                    None
                }
            };
            segments.push(SegmentObservation {
                time_offset_seconds,
                prediction,
            });
        }

        timeline::aggregate(&segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::AcousticFeatureSet;
    use crate::providers::ClassificationError;

    /// Extractor stub returning a fixed feature set.
    struct FixedExtractor(AcousticFeatureSet);

    impl FeatureExtractor for FixedExtractor {
        fn extract(
            &self,
            _samples: &[f32],
            _sample_rate: u32,
        ) -> Result<AcousticFeatureSet, ExtractionError> {
            Ok(self.0.clone())
        }
    }

    /// Extractor stub that always fails.
    struct BrokenExtractor;

    impl FeatureExtractor for BrokenExtractor {
        fn extract(
            &self,
            _samples: &[f32],
            _sample_rate: u32,
        ) -> Result<AcousticFeatureSet, ExtractionError> {
            Err(ExtractionError::UnreadableAudio("decode failed".to_string()))
        }
    }

    /// Classifier stub returning fixed predictions.
    struct FixedClassifier(Vec<Prediction>);

    impl AudioClassifier for FixedClassifier {
        fn classify(
            &self,
            _samples: &[f32],
            _sample_rate: u32,
        ) -> Result<Vec<Prediction>, ClassificationError> {
            Ok(self.0.clone())
        }
    }

    /// Classifier stub that always fails.
    struct BrokenClassifier;

    impl AudioClassifier for BrokenClassifier {
        fn classify(
            &self,
            _samples: &[f32],
            _sample_rate: u32,
        ) -> Result<Vec<Prediction>, ClassificationError> {
            Err(ClassificationError::Inference("model crashed".to_string()))
        }
    }

    fn prediction(label: &str, score: f64) -> Prediction {
        Prediction {
            label: label.to_string(),
            score,
        }
    }

    fn happy_analyzer() -> Analyzer<FixedExtractor, FixedClassifier, FixedClassifier> {
        Analyzer::new(
            FixedExtractor(AcousticFeatureSet::typical()),
            FixedClassifier(vec![
                prediction("happy", 88.0),
                prediction("neutral", 8.0),
                prediction("calm", 3.0),
                prediction("sad", 1.0),
            ]),
            FixedClassifier(vec![prediction("hello", 75.0), prediction("stop", 30.0)]),
        )
    }

    /// 10 seconds of silence at 16 kHz: 5 timeline segments.
    fn ten_seconds() -> Vec<f32> {
        vec![0.0; 160_000]
    }

    #[test]
    fn test_full_report_assembly() {
        let result = happy_analyzer().analyze(&ten_seconds(), 16_000).unwrap();

        assert_eq!(result.emotion, "happy");
        assert!(result.vocal_health_score > 70.0);
        assert_eq!(result.live_analysis.quality, "good");
        assert_eq!(result.live_analysis.status, "completed");
        assert_eq!(result.live_analysis.duration, 10.0);

        // 5 segments for a 10 s clip, all classified happy.
        assert_eq!(result.emotion_timeline.len(), 5);
        assert_eq!(result.timeline_emotion, "happy");
        assert_eq!(result.emotion_distribution["happy"], 5);
        assert_eq!(result.heatmap.times.len(), 5);
        assert_eq!(result.heatmap.times[1], "2.0s");

        // Keyword filter: only scores above 50 survive.
        assert_eq!(result.trigger_word_alert, vec!["hello"]);

        // Diagnostics keep the top 3 predictions.
        assert_eq!(result.raw.emotion.all_emotions.len(), 3);
        assert_eq!(result.raw.emotion.confidence, 88.0);

        assert!(!result.suggestions.is_empty());
        assert!((0.0..=1.0).contains(&result.age_confidence));
        assert!((10..=80).contains(&result.voice_age));
    }

    #[test]
    fn test_extraction_failure_propagates() {
        let analyzer = Analyzer::new(
            BrokenExtractor,
            FixedClassifier(vec![prediction("happy", 88.0)]),
            FixedClassifier(vec![]),
        );
        let err = analyzer.analyze(&ten_seconds(), 16_000).unwrap_err();
        assert!(matches!(err, AnalysisError::FeatureExtraction(_)));
    }

    #[test]
    fn test_empty_clip_is_rejected() {
        let err = happy_analyzer().analyze(&[], 16_000).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyClip));
    }

    #[test]
    fn test_classifier_failures_degrade_gracefully() {
        let analyzer = Analyzer::new(
            FixedExtractor(AcousticFeatureSet::typical()),
            BrokenClassifier,
            BrokenClassifier,
        );
        let result = analyzer.analyze(&ten_seconds(), 16_000).unwrap();

        // Emotion falls back to neutral with zero confidence.
        assert_eq!(result.emotion, "neutral");
        assert_eq!(result.raw.emotion.confidence, 0.0);
        assert!(result.raw.emotion.all_emotions.is_empty());

        // Every timeline segment substituted in place.
        assert_eq!(result.timeline_emotion, "neutral");
        assert_eq!(result.emotion_distribution["neutral"], 5);
        assert!(result.emotion_timeline.iter().all(|p| p.confidence == 50.0));

        // No trigger words, but suggestions still present.
        assert!(result.trigger_word_alert.is_empty());
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn test_determinism() {
        let analyzer = happy_analyzer();
        let samples = ten_seconds();
        let a = analyzer.analyze(&samples, 16_000).unwrap();
        let b = analyzer.analyze(&samples, 16_000).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_output_record_schema() {
        let result = happy_analyzer().analyze(&ten_seconds(), 16_000).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        for field in [
            "vocal_health_score",
            "emotion",
            "stress_level",
            "stress_level_category",
            "stress_components",
            "timeline_emotion",
            "emotion_timeline",
            "emotion_distribution",
            "issues_detected",
            "early_illness_signals",
            "personality_analysis",
            "personality_confidence",
            "voice_age",
            "age_confidence",
            "detected_gender",
            "age_features",
            "trigger_word_alert",
            "suggestions",
            "heatmap",
            "live_analysis",
            "raw",
        ] {
            assert!(json.get(field).is_some(), "missing field: {field}");
        }

        assert!(json["voice_age"].is_u64());
        assert_eq!(json["stress_level_category"], "Low");
        assert_eq!(json["detected_gender"], "unknown");
        assert!(json["heatmap"]["times"].is_array());
        assert!(json["raw"]["health"]["metrics"].is_object());
    }

    #[test]
    fn test_short_clip_gets_three_segments() {
        // 2 seconds at 16 kHz.
        let samples = vec![0.0f32; 32_000];
        let result = happy_analyzer().analyze(&samples, 16_000).unwrap();
        assert_eq!(result.emotion_timeline.len(), 3);
    }
}
