//! Analyzer configuration.

/// Configuration for the analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Minimum classifier score for a keyword to be reported as a
    /// trigger-word alert.
    pub trigger_score_threshold: f64,
    /// Maximum number of trigger-word labels reported.
    pub max_trigger_words: usize,
    /// Number of top emotion predictions kept for diagnostics.
    pub emotion_diagnostics: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            trigger_score_threshold: 50.0,
            max_trigger_words: 5,
            emotion_diagnostics: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.trigger_score_threshold, 50.0);
        assert_eq!(config.max_trigger_words, 5);
        assert_eq!(config.emotion_diagnostics, 3);
    }
}
