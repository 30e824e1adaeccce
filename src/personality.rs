//! Personality trait profiling from prosodic and spectral statistics.
//!
//! Five trait scores are derived independently, each clamped to
//! [0, 100]. These are voice-derived heuristics, not a validated
//! psychometric instrument, so the profile carries a fixed, deliberately
//! modest confidence.

use serde::{Deserialize, Serialize};

use crate::features::{finite_or, round2, AcousticFeatureSet};

/// Fixed confidence for a successful profile.
const CONFIDENCE: f64 = 0.65;

/// Confidence for the total-failure fallback profile.
const FAILURE_CONFIDENCE: f64 = 0.2;

/// Sanitization fallbacks for non-finite inputs. Mid-range values, so a
/// fully unmeasurable clip profiles to neutral mid-scale traits.
const TEMPO_FALLBACK: f64 = 120.0;
const ENERGY_FALLBACK: f64 = 0.02;
const PITCH_MEAN_FALLBACK: f64 = 150.0;
const PITCH_STD_FALLBACK: f64 = 30.0;
const CENTROID_FALLBACK: f64 = 1500.0;
const BANDWIDTH_FALLBACK: f64 = 1500.0;
const ROLLOFF_FALLBACK: f64 = 2000.0;
const SPEECH_RATIO_FALLBACK: f64 = 0.5;
const DYNAMIC_RANGE_FALLBACK: f64 = 0.02;

/// The five trait scores, each in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitScores {
    pub extraversion: f64,
    pub emotional_stability: f64,
    pub openness: f64,
    pub agreeableness: f64,
    pub conscientiousness: f64,
}

/// Diagnostic snapshot of the sanitized inputs the profile used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalityFeatures {
    pub tempo: f64,
    pub energy: f64,
    pub pitch_std: f64,
    pub spectral_centroid: f64,
    pub spectral_bandwidth: f64,
    pub spectral_rolloff: f64,
    pub speech_ratio: f64,
    pub dynamic_range: f64,
}

/// Personality profile for one clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalityResult {
    pub traits: TraitScores,
    /// Profile confidence in [0, 1].
    pub confidence: f64,
    pub features: PersonalityFeatures,
}

impl PersonalityResult {
    /// Documented total-failure profile: all traits at the midpoint.
    pub fn fallback() -> Self {
        Self {
            traits: TraitScores {
                extraversion: 50.0,
                emotional_stability: 50.0,
                openness: 50.0,
                agreeableness: 50.0,
                conscientiousness: 50.0,
            },
            confidence: FAILURE_CONFIDENCE,
            features: PersonalityFeatures::default(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| finite_or(*v, 0.0)).sum::<f64>() / values.len() as f64
}

/// Derive the five trait scores from the acoustic feature set.
pub fn profile(features: &AcousticFeatureSet) -> PersonalityResult {
    let tempo = finite_or(features.tempo, TEMPO_FALLBACK);
    let energy = finite_or(features.energy, ENERGY_FALLBACK);
    let pitch_mean = finite_or(features.pitch_mean, PITCH_MEAN_FALLBACK);
    let pitch_std = finite_or(features.pitch_std, PITCH_STD_FALLBACK);
    let centroid = finite_or(features.spectral_centroid, CENTROID_FALLBACK);
    let bandwidth = finite_or(features.spectral_bandwidth, BANDWIDTH_FALLBACK);
    let rolloff = finite_or(features.spectral_rolloff, ROLLOFF_FALLBACK);
    let speech_ratio = finite_or(features.speech_ratio, SPEECH_RATIO_FALLBACK);
    let dynamic_range = finite_or(features.dynamic_range, DYNAMIC_RANGE_FALLBACK);
    let mfcc_std_mean = mean(&features.mfcc_std);
    let mfcc_std_head = mean(&features.mfcc_std[..5]);

    // Fast, energetic, speech-dense delivery.
    let extraversion = (tempo / 150.0 * 40.0).min(40.0)
        + (energy * 500.0).min(30.0)
        + speech_ratio * 30.0;

    // Steady pitch, narrow dynamics, consistent timbre.
    let emotional_stability = 0.4 * (100.0 - pitch_std / 50.0 * 100.0).max(0.0)
        + 0.3 * (100.0 - dynamic_range * 2000.0).max(0.0)
        + 0.3 * (100.0 - mfcc_std_mean * 10.0).max(0.0);

    // Bright, wide spectrum with expressive pitch movement.
    let openness = (centroid / 30.0).min(40.0)
        + (bandwidth / 50.0).min(30.0)
        + (pitch_std / 30.0 * 30.0).min(30.0);

    // Warm mid-range pitch and a settled lower timbre.
    let agreeableness = 0.5 * (100.0 - (pitch_mean - 180.0).abs() / 2.0)
        + 0.5 * (100.0 - mfcc_std_head * 15.0).max(0.0);

    // Tracks stability plus spectral discipline.
    let conscientiousness =
        0.6 * (0.6 * emotional_stability) + 0.4 * (rolloff / 40.0).min(40.0);

    let traits = TraitScores {
        extraversion: round2(extraversion.clamp(0.0, 100.0)),
        emotional_stability: round2(emotional_stability.clamp(0.0, 100.0)),
        openness: round2(openness.clamp(0.0, 100.0)),
        agreeableness: round2(agreeableness.clamp(0.0, 100.0)),
        conscientiousness: round2(conscientiousness.clamp(0.0, 100.0)),
    };

    tracing::debug!(
        extraversion = traits.extraversion,
        emotional_stability = traits.emotional_stability,
        "personality profiled"
    );

    PersonalityResult {
        traits,
        confidence: CONFIDENCE,
        features: PersonalityFeatures {
            tempo: round2(tempo),
            energy: round2(energy),
            pitch_std: round2(pitch_std),
            spectral_centroid: round2(centroid),
            spectral_bandwidth: round2(bandwidth),
            spectral_rolloff: round2(rolloff),
            speech_ratio: round2(speech_ratio),
            dynamic_range: round2(dynamic_range),
        },
    }
}
