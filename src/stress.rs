//! Stress estimation from the dominant emotion and vocal health metrics.
//!
//! Five contributors are scored independently, weighted, summed and
//! clamped to [0, 100]. Each weighted contribution is recorded in the
//! result so a report can explain where the score came from.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::round2;
use crate::health::VocalHealthResult;

/// Contributor weights; they sum to 1.0.
const EMOTION_WEIGHT: f64 = 0.35;
const HEALTH_WEIGHT: f64 = 0.25;
const TREMOR_WEIGHT: f64 = 0.20;
const INSTABILITY_WEIGHT: f64 = 0.15;
const PITCH_WEIGHT: f64 = 0.05;

/// Jitter above this contributes a tremor component.
const TREMOR_JITTER_THRESHOLD: f64 = 0.015;

/// Shimmer above this contributes an instability component.
const INSTABILITY_SHIMMER_THRESHOLD: f64 = 0.05;

/// Discrete stress category. Thresholds are half-open with the lower
/// bound inclusive: `<30` Low, `<55` Moderate, `<75` High, else Very High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressLevel {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl StressLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            StressLevel::Low
        } else if score < 55.0 {
            StressLevel::Moderate
        } else if score < 75.0 {
            StressLevel::High
        } else {
            StressLevel::VeryHigh
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StressLevel::Low => "Low",
            StressLevel::Moderate => "Moderate",
            StressLevel::High => "High",
            StressLevel::VeryHigh => "Very High",
        };
        f.write_str(label)
    }
}

/// Weighted stress estimate for one clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressResult {
    /// Stress score in [0, 100].
    pub score: f64,
    pub level: StressLevel,
    /// Weighted contribution of each input to the final score.
    pub components: BTreeMap<String, f64>,
}

/// Base stress for an emotion label, case-insensitive. Unmapped labels
/// sit at the neutral midpoint of 50.
fn emotion_stress(label: &str) -> f64 {
    match label.to_ascii_lowercase().as_str() {
        "angry" => 85.0,
        "fearful" => 80.0,
        "disgusted" => 70.0,
        "sad" => 60.0,
        "surprised" => 50.0,
        "neutral" => 30.0,
        "happy" => 20.0,
        "calm" => 15.0,
        _ => 50.0,
    }
}

/// Estimate stress from the dominant emotion label and the vocal health
/// assessment. Jitter, shimmer and pitch come from the health result's
/// already-sanitized metric subset.
pub fn estimate(emotion: &str, health: &VocalHealthResult) -> StressResult {
    // Without metrics (total-failure health record) the voice-derived
    // contributors have nothing to measure and stay at zero.
    let (jitter, shimmer, pitch_mean) = match &health.metrics {
        Some(m) => (m.jitter, m.shimmer, m.pitch_mean),
        None => (0.005, 0.03, 150.0),
    };

    let emotion_component = emotion_stress(emotion);
    let health_component = 100.0 - health.score;

    let tremor_component = if jitter > TREMOR_JITTER_THRESHOLD {
        ((jitter - TREMOR_JITTER_THRESHOLD) * 2000.0).min(30.0)
    } else {
        0.0
    };

    let instability_component = if shimmer > INSTABILITY_SHIMMER_THRESHOLD {
        ((shimmer - INSTABILITY_SHIMMER_THRESHOLD) * 500.0).min(25.0)
    } else {
        0.0
    };

    // Outer band first: a grossly abnormal pitch short-circuits the
    // tighter check, the bands are never additive.
    let pitch_component = if !(85.0..=255.0).contains(&pitch_mean) {
        15.0
    } else if !(100.0..=240.0).contains(&pitch_mean) {
        10.0
    } else {
        0.0
    };

    let weighted = [
        ("emotion", emotion_component * EMOTION_WEIGHT),
        ("health", health_component * HEALTH_WEIGHT),
        ("tremor", tremor_component * TREMOR_WEIGHT),
        ("instability", instability_component * INSTABILITY_WEIGHT),
        ("pitch_abnormality", pitch_component * PITCH_WEIGHT),
    ];

    let total: f64 = weighted.iter().map(|(_, v)| v).sum();
    let score = round2(total.clamp(0.0, 100.0));
    let level = StressLevel::from_score(score);

    tracing::debug!(score, %level, emotion, "stress estimated");

    StressResult {
        score,
        level,
        components: weighted
            .iter()
            .map(|(name, value)| (name.to_string(), round2(*value)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::AcousticFeatureSet;
    use crate::health;
    use proptest::prelude::*;

    #[test]
    fn test_angry_degraded_voice_scenario() {
        // emotion=angry, health=23.33, jitter=0.02, shimmer=0.08,
        // pitch=150 => score ~53.17, Moderate.
        let features = AcousticFeatureSet {
            jitter: 0.02,
            shimmer: 0.08,
            hnr_mean: 5.0,
            pitch_mean: 150.0,
            ..AcousticFeatureSet::typical()
        };
        let health = health::score(&features);
        assert_eq!(health.score, 23.33);

        let stress = estimate("angry", &health);
        assert_eq!(stress.score, 53.17);
        assert_eq!(stress.level, StressLevel::Moderate);
        assert_eq!(stress.components["emotion"], 29.75);
        assert_eq!(stress.components["tremor"], 2.0);
        assert_eq!(stress.components["instability"], 2.25);
        assert_eq!(stress.components["pitch_abnormality"], 0.0);
    }

    #[test]
    fn test_emotion_lookup_is_case_insensitive() {
        assert_eq!(emotion_stress("ANGRY"), 85.0);
        assert_eq!(emotion_stress("Calm"), 15.0);
        assert_eq!(emotion_stress("bored"), 50.0);
    }

    #[test]
    fn test_category_boundaries_are_exact() {
        assert_eq!(StressLevel::from_score(29.99), StressLevel::Low);
        assert_eq!(StressLevel::from_score(30.00), StressLevel::Moderate);
        assert_eq!(StressLevel::from_score(54.99), StressLevel::Moderate);
        assert_eq!(StressLevel::from_score(55.00), StressLevel::High);
        assert_eq!(StressLevel::from_score(74.99), StressLevel::High);
        assert_eq!(StressLevel::from_score(75.00), StressLevel::VeryHigh);
    }

    #[test]
    fn test_outer_pitch_band_wins() {
        let mut features = AcousticFeatureSet::typical();
        features.pitch_mean = 300.0; // outside both bands
        let health = health::score(&features);
        let outer = estimate("neutral", &health);
        assert_eq!(outer.components["pitch_abnormality"], round2(15.0 * 0.05));

        features.pitch_mean = 95.0; // inside [85,255], outside [100,240]
        let health = health::score(&features);
        let inner = estimate("neutral", &health);
        assert_eq!(inner.components["pitch_abnormality"], round2(10.0 * 0.05));
    }

    #[test]
    fn test_failed_health_record_still_estimates() {
        let health = crate::health::VocalHealthResult::analysis_failed();
        let stress = estimate("neutral", &health);
        // Health stress dominates: 30*0.35 + 100*0.25 = 35.5.
        assert_eq!(stress.score, 35.5);
        assert_eq!(stress.level, StressLevel::Moderate);
        assert_eq!(stress.components["tremor"], 0.0);
        assert_eq!(stress.components["instability"], 0.0);
    }

    #[test]
    fn test_components_sum_to_score() {
        let health = health::score(&AcousticFeatureSet::typical());
        let stress = estimate("sad", &health);
        let sum: f64 = stress.components.values().sum();
        assert!((sum - stress.score).abs() < 0.05, "sum {} vs score {}", sum, stress.score);
    }

    proptest! {
        #[test]
        fn prop_stress_always_bounded(
            jitter in proptest::num::f64::ANY,
            shimmer in proptest::num::f64::ANY,
            hnr in proptest::num::f64::ANY,
            pitch in proptest::num::f64::ANY,
            label in "[a-z]{0,10}",
        ) {
            let features = AcousticFeatureSet {
                jitter,
                shimmer,
                hnr_mean: hnr,
                pitch_mean: pitch,
                ..AcousticFeatureSet::typical()
            };
            let health = health::score(&features);
            let stress = estimate(&label, &health);
            prop_assert!(stress.score.is_finite());
            prop_assert!((0.0..=100.0).contains(&stress.score));
        }
    }
}
