//! Configuration for template matching

/// Tunable knobs for a matching pass.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Minimum correlation score accepted as a match (-1.0 to 1.0).
    ///
    /// Scores below this report the element as absent instead of risking a
    /// tap on a visually dissimilar region. 0.8 works well for pixel-exact
    /// UI captures; lower it for templates taken on a different device.
    pub score_threshold: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.8,
        }
    }
}

impl MatchConfig {
    pub fn with_threshold(score_threshold: f32) -> Self {
        Self { score_threshold }
    }
}
