//! Feature-to-insight scoring engine for recorded voice clips.
//!
//! Turns already-extracted acoustic measurements (jitter, shimmer, HNR,
//! pitch, formants, spectral statistics, tempo/energy) and per-segment
//! emotion predictions into a structured report: a vocal health score,
//! a stress estimate, an age/gender estimate, personality trait scores,
//! an emotion timeline summary and textual suggestions.
//!
//! ## Architecture
//!
//! ```text
//! AcousticFeatureSet ──┬─> health ─> stress <─ emotion label
//!                      ├─> age
//!                      └─> personality
//! segment predictions ──> timeline
//!                              |
//!        analyzer (assembles) <┴─ suggestions
//! ```
//!
//! Every scorer is a pure function: identical inputs give identical
//! outputs, no I/O, no shared mutable state, safe to call concurrently
//! across independent clips. Single unmeasurable features (NaN/Inf) are
//! sanitized to documented fallbacks; whole-component failures return
//! documented default records; only a total inability to obtain
//! features surfaces as an error.

pub mod age;
pub mod analyzer;
pub mod config;
pub mod features;
pub mod health;
pub mod personality;
pub mod providers;
pub mod stress;
pub mod suggestions;
pub mod timeline;

pub use age::{AgeResult, Gender};
pub use analyzer::{AnalysisError, AnalysisResult, Analyzer};
pub use config::AnalyzerConfig;
pub use features::{AcousticFeatureSet, EmotionObservation};
pub use health::VocalHealthResult;
pub use personality::PersonalityResult;
pub use providers::{
    AudioClassifier, ClassificationError, ExtractionError, FeatureExtractor, Prediction,
};
pub use stress::{StressLevel, StressResult};
pub use timeline::{SegmentObservation, TimelineResult};
