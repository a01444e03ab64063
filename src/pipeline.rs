//! One-shot capture → match → resolve → tap orchestration
//!
//! A single `run` is one automation step: grab a frame, locate the template,
//! tap its center. No retries and no polling live here; a caller waiting for
//! an element to appear re-runs the pipeline under its own timeout policy.

use crate::device::{ActionDispatcher, CaptureError, DispatchError, ScreenSource};
use crate::template_matching::{MatchConfig, MatchError, MatchResult, Point, Template, TemplateMatcher};
use serde::Serialize;
use thiserror::Error;

/// A specialized `Result` type for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Any failure that aborts a pipeline run. An absent element is NOT a
/// failure; see [`TapOutcome::ElementAbsent`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Screen capture failed: {source}")]
    Capture {
        #[from]
        source: CaptureError,
    },

    #[error("Template matching failed: {source}")]
    Match {
        #[from]
        source: MatchError,
    },

    #[error("Tap dispatch failed: {source}")]
    Dispatch {
        #[from]
        source: DispatchError,
    },
}

/// Result of one successful pipeline pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TapOutcome {
    /// Element located and tapped at its center.
    Tapped { point: Point, score: f32 },
    /// Element currently not on screen; nothing was dispatched.
    ElementAbsent,
}

/// Closed-loop visual automation over a screen source and a dispatcher.
pub struct TapPipeline<S, D> {
    source: S,
    dispatcher: D,
    matcher: TemplateMatcher,
}

impl<S: ScreenSource, D: ActionDispatcher> TapPipeline<S, D> {
    pub fn new(source: S, dispatcher: D, config: MatchConfig) -> Self {
        Self {
            source,
            dispatcher,
            matcher: TemplateMatcher::new(config),
        }
    }

    /// Run one capture → match → resolve → tap pass for `template`.
    pub async fn run(&self, template: &Template) -> PipelineResult<TapOutcome> {
        let screen = self.source.capture().await?;
        log::debug!(
            "Captured {}x{} frame, searching for '{}'",
            screen.width(),
            screen.height(),
            template.name()
        );

        match self.matcher.find_match(&screen, template)? {
            MatchResult::NotFound => {
                log::info!("Template '{}' not on screen", template.name());
                Ok(TapOutcome::ElementAbsent)
            }
            MatchResult::Found { anchor, score } => {
                let point = template.center_at(anchor);
                log::info!(
                    "Matched '{}' at ({},{}) score {:.3}, tapping center ({},{})",
                    template.name(),
                    anchor.x,
                    anchor.y,
                    score,
                    point.x,
                    point.y
                );
                self.dispatcher.tap(point).await?;
                Ok(TapOutcome::Tapped { point, score })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use std::sync::Mutex;

    struct FakeScreen {
        frame: GrayImage,
    }

    impl ScreenSource for FakeScreen {
        async fn capture(&self) -> Result<GrayImage, CaptureError> {
            Ok(self.frame.clone())
        }
    }

    struct FailingScreen;

    impl ScreenSource for FailingScreen {
        async fn capture(&self) -> Result<GrayImage, CaptureError> {
            Err(CaptureError::ScreencapFailed {
                stderr: "device offline".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        taps: Mutex<Vec<Point>>,
    }

    impl ActionDispatcher for RecordingDispatcher {
        async fn tap(&self, point: Point) -> Result<(), DispatchError> {
            self.taps.lock().unwrap().push(point);
            Ok(())
        }
    }

    fn checker_template() -> Template {
        let image = GrayImage::from_fn(10, 10, |x, y| {
            Luma([if (x / 2 + y / 2) % 2 == 0 { 230 } else { 20 }])
        });
        Template::from_image("button", image).unwrap()
    }

    fn frame_with_template_at(template: &Template, at_x: u32, at_y: u32) -> GrayImage {
        let mut frame = GrayImage::from_fn(60, 60, |x, y| {
            let v = x
                .wrapping_mul(2_654_435_761)
                .wrapping_add(y.wrapping_mul(40_503));
            Luma([(v >> 7) as u8])
        });
        for (dx, dy, pixel) in template.image().enumerate_pixels() {
            frame.put_pixel(at_x + dx, at_y + dy, *pixel);
        }
        frame
    }

    #[tokio::test]
    async fn test_pipeline_taps_center_of_match() {
        let template = checker_template();
        let source = FakeScreen {
            frame: frame_with_template_at(&template, 20, 30),
        };
        let dispatcher = RecordingDispatcher::default();
        let pipeline = TapPipeline::new(source, &dispatcher, MatchConfig::default());

        let outcome = pipeline.run(&template).await.unwrap();
        match outcome {
            TapOutcome::Tapped { point, score } => {
                assert_eq!(point, Point::new(25, 35));
                assert!(score > 0.999);
            }
            TapOutcome::ElementAbsent => panic!("embedded template not found"),
        }
        assert_eq!(*dispatcher.taps.lock().unwrap(), vec![Point::new(25, 35)]);
    }

    #[tokio::test]
    async fn test_pipeline_absent_element_sends_no_tap() {
        let template = checker_template();
        let source = FakeScreen {
            frame: GrayImage::from_pixel(60, 60, Luma([128])),
        };
        let dispatcher = RecordingDispatcher::default();
        let pipeline = TapPipeline::new(source, &dispatcher, MatchConfig::default());

        let outcome = pipeline.run(&template).await.unwrap();
        assert_eq!(outcome, TapOutcome::ElementAbsent);
        assert!(dispatcher.taps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_propagates_capture_failure() {
        let template = checker_template();
        let dispatcher = RecordingDispatcher::default();
        let pipeline = TapPipeline::new(FailingScreen, &dispatcher, MatchConfig::default());

        let err = pipeline.run(&template).await.unwrap_err();
        assert!(matches!(err, PipelineError::Capture { .. }));
        assert!(dispatcher.taps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_oversize_template_is_match_error() {
        let template = Template::from_image(
            "huge",
            GrayImage::from_pixel(100, 100, Luma([10])),
        )
        .unwrap();
        let source = FakeScreen {
            frame: GrayImage::from_pixel(60, 60, Luma([128])),
        };
        let dispatcher = RecordingDispatcher::default();
        let pipeline = TapPipeline::new(source, &dispatcher, MatchConfig::default());

        let err = pipeline.run(&template).await.unwrap_err();
        assert!(matches!(err, PipelineError::Match { .. }));
    }
}
