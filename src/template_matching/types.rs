//! Template matching data types

use super::error::MatchError;
use image::GrayImage;
use serde::Serialize;
use std::path::Path;

/// A point in screen pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Reference image of a single UI element used as the matching target.
///
/// Invariant: both dimensions are greater than zero, enforced by the
/// constructors.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    image: GrayImage,
}

impl Template {
    /// Wrap an in-memory grayscale image as a template.
    pub fn from_image(name: impl Into<String>, image: GrayImage) -> Result<Self, MatchError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(MatchError::EmptyTemplate);
        }
        Ok(Self {
            name: name.into(),
            image,
        })
    }

    /// Load a template from a PNG/JPEG file, converting to grayscale.
    /// The file stem becomes the template name.
    pub fn from_file(path: &str) -> Result<Self, MatchError> {
        let image = image::open(path)
            .map_err(|source| MatchError::TemplateLoadFailed {
                path: path.to_string(),
                source,
            })?
            .to_luma8();
        let name = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self::from_image(name, image)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Center of this template when anchored at `anchor`, the coordinate a
    /// tap should land on. Integer division keeps the point inside the
    /// matched region.
    pub fn center_at(&self, anchor: Point) -> Point {
        Point::new(anchor.x + self.width() / 2, anchor.y + self.height() / 2)
    }
}

/// Outcome of a matching pass over one screen frame.
///
/// `NotFound` means the element is currently absent from the screen; it is a
/// normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult {
    NotFound,
    Found {
        /// Top-left pixel of the best-aligned template position.
        anchor: Point,
        /// Normalized cross-correlation score, -1.0 to 1.0. Always at or
        /// above the threshold the matcher was configured with.
        score: f32,
    },
}

impl MatchResult {
    /// Resolve this result to an actionable tap point, the center of the
    /// matched region. `NotFound` resolves to `None`.
    pub fn resolve(&self, template: &Template) -> Option<Point> {
        match self {
            MatchResult::NotFound => None,
            MatchResult::Found { anchor, .. } => Some(template.center_at(*anchor)),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found { .. })
    }
}
