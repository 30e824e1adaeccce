//! External collaborator contracts.
//!
//! The engine consumes already-extracted features and already-scored
//! classifier predictions. Audio decoding, resampling, DSP feature
//! extraction and model inference all live behind these traits; model
//! handles are loaded once at process start, injected into the
//! [`Analyzer`](crate::analyzer::Analyzer) at construction and treated
//! as read-only afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::AcousticFeatureSet;

/// Errors from the acoustic extraction frontend.
///
/// Single unmeasurable features are reported as NaN inside the feature
/// set, never as an error: an `Err` here means no features could be
/// obtained at all, the only failure that propagates to the caller.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("audio is empty or unreadable: {0}")]
    UnreadableAudio(String),

    #[error("feature extraction failed: {0}")]
    Failed(String),
}

/// Errors from an audio classification model.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("inference error: {0}")]
    Inference(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// One labeled prediction from an audio classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Score in [0, 100].
    pub score: f64,
}

/// Acoustic feature extraction contract.
pub trait FeatureExtractor {
    /// Extract the acoustic feature set for a whole clip.
    ///
    /// Implementations report unmeasurable single features as NaN rather
    /// than failing, and substitute a zero-crossing-rate proxy scaled to
    /// a tempo-like range when beat tracking is unavailable.
    fn extract(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<AcousticFeatureSet, ExtractionError>;
}

/// Audio classification contract (emotion or keyword models).
///
/// Predictions are returned sorted descending by score. The engine
/// consumes the top label (plus the top few for diagnostics).
pub trait AudioClassifier {
    fn classify(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<Vec<Prediction>, ClassificationError>;
}

/// Filter keyword predictions down to trigger-word alerts: keep labels
/// scoring above `threshold`, at most `max_words`, classifier order
/// preserved.
pub fn filter_trigger_words(
    predictions: &[Prediction],
    threshold: f64,
    max_words: usize,
) -> Vec<String> {
    predictions
        .iter()
        .filter(|p| p.score > threshold)
        .take(max_words)
        .map(|p| p.label.clone())
        .collect()
}
