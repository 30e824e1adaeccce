//! Rule-based suggestion generation.
//!
//! Rules are evaluated in a fixed order and each appends at most one
//! recommendation. The output is never empty: when nothing fires, a
//! single positive affirmation is returned.

use crate::health::VocalHealthResult;
use crate::stress::StressResult;

/// Health score below this prompts hydration/rest advice.
const LOW_HEALTH_THRESHOLD: f64 = 50.0;

/// Stress score above this prompts relaxation advice.
const HIGH_STRESS_THRESHOLD: f64 = 70.0;

/// Generate recommendations from the assembled sub-results. `emotion`
/// is the clip's primary emotion label.
pub fn generate(health: &VocalHealthResult, stress: &StressResult, emotion: &str) -> Vec<String> {
    let mut suggestions = Vec::new();

    if health.score < LOW_HEALTH_THRESHOLD {
        suggestions.push("Consider vocal rest and stay hydrated".to_string());
    }
    if stress.score > HIGH_STRESS_THRESHOLD {
        suggestions.push("High stress detected - try relaxation exercises".to_string());
    }
    if health.issues.iter().any(|issue| issue.contains("High jitter")) {
        suggestions.push("Practice gentle vocal warm-ups".to_string());
    }
    if matches!(
        emotion.to_ascii_lowercase().as_str(),
        "angry" | "sad" | "fearful"
    ) {
        suggestions.push("Consider stress management techniques".to_string());
    }

    if suggestions.is_empty() {
        suggestions.push("Voice health is good - keep it up!".to_string());
    }
    suggestions
}
