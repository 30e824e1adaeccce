//! Emotion timeline aggregation.
//!
//! The clip is split into a duration-dependent number of segments by the
//! classification collaborator; this module reduces the per-segment
//! outcomes into a dominant emotion, a label histogram and a
//! heatmap-ready series. A single failed segment never aborts the
//! aggregation: it is replaced in place by a neutral observation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::{round2, EmotionObservation};
use crate::providers::Prediction;

/// Label substituted for a failed segment classification.
const FALLBACK_EMOTION: &str = "neutral";

/// Confidence substituted for a failed segment classification.
const FALLBACK_CONFIDENCE: f64 = 50.0;

/// Number of timeline segments for a clip of the given duration: short
/// clips get a coarse 3-way split, medium clips 5, long clips one
/// segment per ~3 seconds capped at 10.
pub fn segment_count(duration_seconds: f64) -> usize {
    if !duration_seconds.is_finite() || duration_seconds < 5.0 {
        3
    } else if duration_seconds < 15.0 {
        5
    } else {
        ((duration_seconds / 3.0) as usize).min(10)
    }
}

/// Outcome of classifying one timeline segment. `prediction` is `None`
/// when the classifier failed for that segment.
#[derive(Debug, Clone)]
pub struct SegmentObservation {
    pub time_offset_seconds: f64,
    pub prediction: Option<Prediction>,
}

impl SegmentObservation {
    /// Sanitized per-segment record, substituting the neutral fallback
    /// when the classifier produced nothing for this segment.
    pub fn observation(&self) -> EmotionObservation {
        match &self.prediction {
            Some(p) => EmotionObservation {
                time_offset_seconds: self.time_offset_seconds,
                label: p.label.clone(),
                confidence: round2(p.score),
            },
            None => EmotionObservation {
                time_offset_seconds: self.time_offset_seconds,
                label: FALLBACK_EMOTION.to_string(),
                confidence: FALLBACK_CONFIDENCE,
            },
        }
    }
}

/// One point of the heatmap-ready series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Segment start, formatted as seconds with one decimal ("7.5s").
    pub time: String,
    pub emotion: String,
    pub confidence: f64,
}

/// Aggregated emotion timeline for one clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineResult {
    pub dominant_emotion: String,
    /// Occurrence count per label.
    pub distribution: BTreeMap<String, u32>,
    /// Input-ordered series, one point per segment.
    pub series: Vec<TimelinePoint>,
}

/// Reduce per-segment outcomes into the timeline summary.
///
/// Dominance ties resolve to the first label reaching the maximum count
/// in input order.
pub fn aggregate(segments: &[SegmentObservation]) -> TimelineResult {
    let mut series = Vec::with_capacity(segments.len());
    // First-appearance order, needed for deterministic tie-breaking.
    let mut counts: Vec<(String, u32)> = Vec::new();

    for segment in segments {
        let observation = segment.observation();
        match counts.iter_mut().find(|(label, _)| *label == observation.label) {
            Some((_, n)) => *n += 1,
            None => counts.push((observation.label.clone(), 1)),
        }
        series.push(TimelinePoint {
            time: format!("{:.1}s", observation.time_offset_seconds),
            emotion: observation.label,
            confidence: observation.confidence,
        });
    }

    let mut dominant = FALLBACK_EMOTION.to_string();
    let mut best = 0;
    for (label, n) in &counts {
        if *n > best {
            best = *n;
            dominant = label.clone();
        }
    }

    TimelineResult {
        dominant_emotion: dominant,
        distribution: counts.into_iter().collect(),
        series,
    }
}
