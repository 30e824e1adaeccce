//! Acoustic feature inputs and sanitization.
//!
//! [`AcousticFeatureSet`] is the hand-off point between the external
//! extraction frontend and the scoring engine. Any field may arrive as
//! NaN or infinite: the extraction contract treats non-finite as
//! "unmeasurable", not as an error. Every consumer sanitizes each value
//! to its documented fallback constant before use, so non-finite values
//! never cross a component boundary.

use serde::{Deserialize, Serialize};

/// Number of MFCC coefficients carried per clip.
pub const MFCC_COEFFS: usize = 13;

/// Immutable acoustic measurement set for one audio clip.
///
/// All values are as produced by the extraction frontend; nothing here
/// is sanitized yet. Scorers apply their own fallback constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcousticFeatureSet {
    /// Cycle-to-cycle pitch period variation (>= 0 when measurable).
    pub jitter: f64,
    /// Cycle-to-cycle amplitude variation (>= 0 when measurable).
    pub shimmer: f64,
    /// Mean harmonics-to-noise ratio in dB.
    pub hnr_mean: f64,
    /// Mean fundamental frequency in Hz; 0 signals an empty pitch track.
    pub pitch_mean: f64,
    /// Standard deviation of the fundamental frequency in Hz.
    pub pitch_std: f64,
    /// First formant frequency in Hz.
    pub formant_f1: f64,
    /// Second formant frequency in Hz.
    pub formant_f2: f64,
    /// Spectral centroid in Hz (brightness).
    pub spectral_centroid: f64,
    /// Spectral bandwidth in Hz (spread).
    pub spectral_bandwidth: f64,
    /// Spectral rolloff in Hz (energy concentration).
    pub spectral_rolloff: f64,
    /// Mean of each of the 13 MFCC coefficients.
    pub mfcc_mean: [f64; MFCC_COEFFS],
    /// Standard deviation of each of the 13 MFCC coefficients.
    pub mfcc_std: [f64; MFCC_COEFFS],
    /// Estimated tempo in BPM. Extractors substitute a ZCR-derived proxy
    /// when beat tracking fails; see `FeatureExtractor::extract`.
    pub tempo: f64,
    /// Mean frame-level RMS energy (>= 0 when measurable).
    pub energy: f64,
    /// Fraction of frames containing speech, in [0, 1].
    pub speech_ratio: f64,
    /// Frame-level RMS dynamic range (>= 0 when measurable).
    pub dynamic_range: f64,
}

/// One classified timeline segment: chronological position, emotion
/// label and classifier confidence in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionObservation {
    pub time_offset_seconds: f64,
    pub label: String,
    /// Confidence in [0, 100].
    pub confidence: f64,
}

/// Replace a non-finite value with its documented fallback constant.
pub(crate) fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // Scaling overflowed; the value is already far beyond any
        // precision the report cares about.
        return value;
    }
    scaled.round() / factor
}

pub(crate) fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

#[cfg(test)]
impl AcousticFeatureSet {
    /// A healthy adult voice: every scorer stays inside its typical bands.
    pub(crate) fn typical() -> Self {
        Self {
            jitter: 0.003,
            shimmer: 0.02,
            hnr_mean: 18.0,
            pitch_mean: 150.0,
            pitch_std: 25.0,
            formant_f1: 600.0,
            formant_f2: 1700.0,
            spectral_centroid: 1800.0,
            spectral_bandwidth: 1600.0,
            spectral_rolloff: 3200.0,
            mfcc_mean: [0.5; MFCC_COEFFS],
            mfcc_std: [2.0; MFCC_COEFFS],
            tempo: 120.0,
            energy: 0.04,
            speech_ratio: 0.7,
            dynamic_range: 0.015,
        }
    }

    /// Every field non-finite: exercises the sanitization paths.
    pub(crate) fn unmeasurable() -> Self {
        Self {
            jitter: f64::NAN,
            shimmer: f64::NAN,
            hnr_mean: f64::NAN,
            pitch_mean: f64::INFINITY,
            pitch_std: f64::NAN,
            formant_f1: f64::NAN,
            formant_f2: f64::NAN,
            spectral_centroid: f64::NEG_INFINITY,
            spectral_bandwidth: f64::NAN,
            spectral_rolloff: f64::NAN,
            mfcc_mean: [f64::NAN; MFCC_COEFFS],
            mfcc_std: [f64::NAN; MFCC_COEFFS],
            tempo: f64::NAN,
            energy: f64::NAN,
            speech_ratio: f64::NAN,
            dynamic_range: f64::NAN,
        }
    }
}
