pub mod args;
pub mod device;
pub mod pipeline;
pub mod template_matching;

pub use device::{ActionDispatcher, AdbShell, ScreenSource};
pub use pipeline::{PipelineError, TapOutcome, TapPipeline};
pub use template_matching::{MatchConfig, MatchResult, Point, Template, TemplateMatcher};
