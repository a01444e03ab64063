//! Grayscale template matching for locating UI elements in screenshots
//!
//! A template is a small reference image of a single UI element. The matcher
//! slides it over every valid position in a captured frame, scores each
//! position with zero-mean normalized cross-correlation and returns the best
//! anchor if it clears the configured threshold.

pub mod config;
pub mod error;
pub mod matcher;
pub mod types;

pub use config::MatchConfig;
pub use error::MatchError;
pub use matcher::TemplateMatcher;
pub use types::{MatchResult, Point, Template};
