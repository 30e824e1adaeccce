//! Vocal health scoring from jitter, shimmer, HNR and pitch variation.
//!
//! ## Concept
//! Jitter and shimmer measure cycle-to-cycle instability of the vocal
//! folds; HNR measures how much of the signal is periodic. Healthy
//! voices have low jitter/shimmer and high HNR, so each metric maps
//! linearly onto a 0-100 sub-score and the health score is their mean.
//!
//! Elevated metrics additionally produce human-readable issue strings
//! and early illness signals, evaluated in a fixed order.

use serde::{Deserialize, Serialize};

use crate::features::{finite_or, round2, round_to, AcousticFeatureSet};

/// Fallback jitter when the measurement is non-finite.
const JITTER_FALLBACK: f64 = 0.005;

/// Fallback shimmer when the measurement is non-finite.
const SHIMMER_FALLBACK: f64 = 0.03;

/// Fallback HNR in dB when the measurement is non-finite.
const HNR_FALLBACK: f64 = 15.0;

/// Jitter above this indicates vocal strain.
const JITTER_ISSUE_THRESHOLD: f64 = 0.01;

/// Shimmer above this indicates voice instability.
const SHIMMER_ISSUE_THRESHOLD: f64 = 0.05;

/// HNR below this indicates a rough or breathy voice.
const HNR_ISSUE_THRESHOLD: f64 = 10.0;

/// Pitch standard deviation above this indicates emotional stress.
const PITCH_STD_ISSUE_THRESHOLD: f64 = 50.0;

/// Sanitized metric subset reported alongside the health score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub jitter: f64,
    pub shimmer: f64,
    pub hnr: f64,
    pub pitch_mean: f64,
}

/// Vocal health assessment for one clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocalHealthResult {
    /// Overall vocal health in [0, 100].
    pub score: f64,
    /// Detected issues, in fixed evaluation order.
    pub issues: Vec<String>,
    /// Early illness signals paired with the issues above.
    pub illness_signals: Vec<String>,
    /// Sanitized metrics; `None` only in the total-failure record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<HealthMetrics>,
}

impl VocalHealthResult {
    /// Documented total-failure record, returned when no feature set
    /// could be obtained for the clip.
    pub fn analysis_failed() -> Self {
        Self {
            score: 0.0,
            issues: vec!["Analysis failed".to_string()],
            illness_signals: Vec::new(),
            metrics: None,
        }
    }
}

/// Score vocal health from the acoustic feature set.
pub fn score(features: &AcousticFeatureSet) -> VocalHealthResult {
    let jitter = finite_or(features.jitter, JITTER_FALLBACK);
    let shimmer = finite_or(features.shimmer, SHIMMER_FALLBACK);
    let hnr = finite_or(features.hnr_mean, HNR_FALLBACK);

    let hnr_score = ((hnr + 10.0) / 30.0 * 100.0).clamp(0.0, 100.0);
    let jitter_score = ((1.0 - jitter * 100.0) * 100.0).clamp(0.0, 100.0);
    let shimmer_score = ((1.0 - shimmer * 10.0) * 100.0).clamp(0.0, 100.0);

    let mean = (hnr_score + jitter_score + shimmer_score) / 3.0;
    let health_score = if mean.is_finite() { round2(mean) } else { 0.0 };

    let mut issues = Vec::new();
    let mut illness_signals = Vec::new();

    if jitter > JITTER_ISSUE_THRESHOLD {
        issues.push("High jitter – vocal strain detected".to_string());
        illness_signals.push("Possible vocal cord tension".to_string());
    }
    if shimmer > SHIMMER_ISSUE_THRESHOLD {
        issues.push("High shimmer – voice instability".to_string());
        illness_signals.push("Potential hoarseness or fatigue".to_string());
    }
    if hnr < HNR_ISSUE_THRESHOLD {
        issues.push("Low HNR – rough or breathy voice".to_string());
        illness_signals.push("Possible respiratory issue".to_string());
    }
    // Pitch variation is only meaningful when the pitch track is non-empty.
    if features.pitch_mean.is_finite()
        && features.pitch_mean > 0.0
        && features.pitch_std.is_finite()
        && features.pitch_std > PITCH_STD_ISSUE_THRESHOLD
    {
        issues.push("High pitch variation – emotional stress".to_string());
    }

    if !issues.is_empty() {
        tracing::debug!(score = health_score, issue_count = issues.len(), "vocal health issues detected");
    }

    let pitch_mean = if features.pitch_mean.is_finite() && features.pitch_mean > 0.0 {
        round2(features.pitch_mean)
    } else {
        0.0
    };

    VocalHealthResult {
        score: health_score,
        issues,
        illness_signals,
        metrics: Some(HealthMetrics {
            jitter: round_to(jitter, 4),
            shimmer: round_to(shimmer, 4),
            hnr: round2(hnr),
            pitch_mean,
        }),
    }
}
