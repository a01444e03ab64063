use thiserror::Error;

/// The error type for template loading and matching.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Template has zero width or height")]
    EmptyTemplate,

    #[error("Failed to load template {path}: {source}")]
    TemplateLoadFailed {
        path: String,
        source: image::ImageError,
    },

    #[error(
        "Template ({template_width}x{template_height}) is larger than the screen ({screen_width}x{screen_height})"
    )]
    TemplateLargerThanScreen {
        template_width: u32,
        template_height: u32,
        screen_width: u32,
        screen_height: u32,
    },
}
