//! Voice age and gender estimation.
//!
//! ## Concept
//! Fundamental frequency separates gender bands; within a gender, a
//! piecewise-linear curve over the pitch mean gives a base age (higher
//! pitch = younger). Voice-quality degradation (elevated jitter/shimmer,
//! flattened pitch contour, lowered first formant, dull spectrum) then
//! nudges the estimate upward by fixed increments. Confidence
//! accumulates from how typical the measurements are.

use serde::{Deserialize, Serialize};

use crate::features::{finite_or, round2, round_to, AcousticFeatureSet};

/// Pitch mean above this classifies as female.
const FEMALE_PITCH_THRESHOLD: f64 = 165.0;

/// Pitch mean below this classifies as male.
const MALE_PITCH_THRESHOLD: f64 = 145.0;

/// Sanitization fallbacks for non-finite inputs.
const JITTER_FALLBACK: f64 = 0.01;
const SHIMMER_FALLBACK: f64 = 0.05;
const PITCH_MEAN_FALLBACK: f64 = 150.0;
const PITCH_STD_FALLBACK: f64 = 30.0;

/// Age estimates are clipped to this range.
const MIN_AGE: f64 = 10.0;
const MAX_AGE: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

/// Diagnostic feature snapshot carried with the age estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgeFeatures {
    pub pitch_mean: f64,
    pub pitch_std: f64,
    pub formant_f1: f64,
    pub jitter: f64,
    pub shimmer: f64,
    pub spectral_centroid: f64,
}

/// Voice age estimate for one clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeResult {
    /// Estimated age in years, in [10, 80].
    pub age: u32,
    /// Estimate confidence in [0, 1].
    pub confidence: f64,
    pub gender: Gender,
    pub features: AgeFeatures,
}

impl AgeResult {
    /// Documented fallback when the pitch track is empty: nothing voiced
    /// was found, so the estimate sits at the population midpoint.
    pub fn fallback() -> Self {
        Self {
            age: 30,
            confidence: 0.3,
            gender: Gender::Unknown,
            features: AgeFeatures::default(),
        }
    }
}

fn classify_gender(pitch_mean: f64) -> Gender {
    if pitch_mean > FEMALE_PITCH_THRESHOLD {
        Gender::Female
    } else if pitch_mean < MALE_PITCH_THRESHOLD {
        Gender::Male
    } else {
        Gender::Unknown
    }
}

/// Linear ramp over a pitch band: `age_young` applies at the band's
/// upper pitch edge, `age_old` at the lower edge. Pitch is clamped into
/// the band first, which bounds the open-ended outer bands.
fn ramp(pitch: f64, pitch_lo: f64, pitch_hi: f64, age_young: f64, age_old: f64) -> f64 {
    let p = pitch.clamp(pitch_lo, pitch_hi);
    age_young + (pitch_hi - p) / (pitch_hi - pitch_lo) * (age_old - age_young)
}

fn base_age(gender: Gender, pitch: f64) -> f64 {
    match gender {
        Gender::Female => {
            if pitch > 220.0 {
                ramp(pitch, 220.0, 300.0, 12.0, 17.0)
            } else if pitch > 200.0 {
                ramp(pitch, 200.0, 220.0, 18.0, 28.0)
            } else if pitch > 180.0 {
                ramp(pitch, 180.0, 200.0, 28.0, 38.0)
            } else {
                ramp(pitch, 120.0, 180.0, 38.0, 52.0)
            }
        }
        Gender::Male => {
            if pitch > 200.0 {
                ramp(pitch, 200.0, 300.0, 12.0, 22.0)
            } else if pitch > 130.0 {
                ramp(pitch, 130.0, 200.0, 22.0, 45.0)
            } else if pitch > 110.0 {
                ramp(pitch, 110.0, 130.0, 45.0, 55.0)
            } else {
                ramp(pitch, 60.0, 110.0, 55.0, 70.0)
            }
        }
        Gender::Unknown => {
            // Indeterminate gender: flat age buckets only.
            if pitch > 200.0 {
                15.0
            } else if pitch > 160.0 {
                25.0
            } else if pitch > 130.0 {
                35.0
            } else {
                50.0
            }
        }
    }
}

/// Estimate gender and voice age from the acoustic feature set.
pub fn estimate(features: &AcousticFeatureSet) -> AgeResult {
    // An empty pitch track (no voiced frames upstream) leaves nothing to
    // estimate from; a wholly non-finite pitch pair means the same.
    let pitchless = (features.pitch_mean.is_finite() && features.pitch_mean <= 0.0)
        || (!features.pitch_mean.is_finite() && !features.pitch_std.is_finite());
    if pitchless {
        tracing::warn!("age estimation: empty pitch track, using fallback");
        return AgeResult::fallback();
    }

    let pitch_mean = finite_or(features.pitch_mean, PITCH_MEAN_FALLBACK);
    let pitch_std = finite_or(features.pitch_std, PITCH_STD_FALLBACK);
    let jitter = finite_or(features.jitter, JITTER_FALLBACK);
    let shimmer = finite_or(features.shimmer, SHIMMER_FALLBACK);

    let gender = classify_gender(pitch_mean);
    let base = base_age(gender, pitch_mean);

    let mut adjustment = 0.0;
    if jitter > 0.015 {
        adjustment += 5.0;
        if jitter > 0.025 {
            adjustment += 8.0;
        }
    }
    if shimmer > 0.06 {
        adjustment += 5.0;
        if shimmer > 0.10 {
            adjustment += 8.0;
        }
    }
    // Low pitch variability reads as an older voice, high as younger.
    if pitch_std < 20.0 {
        adjustment += 5.0;
    } else if pitch_std > 60.0 {
        adjustment -= 3.0;
    }
    // Lowered first formant relative to the gender norm. No threshold is
    // defined for an indeterminate gender, so the adjustment is skipped.
    let f1_threshold = match gender {
        Gender::Female => Some(700.0),
        Gender::Male => Some(500.0),
        Gender::Unknown => None,
    };
    if let Some(threshold) = f1_threshold {
        if features.formant_f1.is_finite() && features.formant_f1 < threshold {
            adjustment += 5.0;
        }
    }
    if features.spectral_centroid.is_finite() && features.spectral_centroid < 1500.0 {
        adjustment += 3.0;
    }

    let age = (base + adjustment).clamp(MIN_AGE, MAX_AGE).round() as u32;

    let mut confidence: f64 = 0.5;
    if gender != Gender::Unknown {
        confidence += 0.2;
    }
    let typical_quality =
        jitter > 0.005 && jitter < 0.03 && shimmer > 0.03 && shimmer < 0.12;
    if typical_quality {
        confidence += 0.15;
    }
    if pitch_std > 10.0 && pitch_std < 70.0 {
        confidence += 0.15;
    }
    let confidence = confidence.min(1.0);

    tracing::debug!(age, ?gender, confidence, "voice age estimated");

    AgeResult {
        age,
        confidence,
        gender,
        features: AgeFeatures {
            pitch_mean: round2(pitch_mean),
            pitch_std: round2(pitch_std),
            formant_f1: round2(finite_or(features.formant_f1, 0.0)),
            jitter: round_to(jitter, 4),
            shimmer: round_to(shimmer, 4),
            spectral_centroid: round2(finite_or(features.spectral_centroid, 0.0)),
        },
    }
}
