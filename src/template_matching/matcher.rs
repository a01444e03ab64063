//! Exhaustive normalized cross-correlation matching
//!
//! Every valid anchor position is scored; the scan runs in row-major order
//! and keeps a strictly better score only, so among equal maxima the
//! topmost-then-leftmost anchor wins and repeated runs over identical
//! inputs return bit-identical results.

use super::config::MatchConfig;
use super::error::MatchError;
use super::types::{MatchResult, Point, Template};
use image::GrayImage;

/// Template matcher for finding a UI element in a screen frame.
pub struct TemplateMatcher {
    config: MatchConfig,
}

impl TemplateMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Find the best-aligned position of `template` inside `screen`.
    ///
    /// Scores are zero-mean normalized cross-correlation, -1.0 (strongly
    /// anti-correlated) to 1.0 (pixel-exact). A best score below the
    /// configured threshold reports `NotFound`. A template larger than the
    /// screen is a caller error, never a silent `NotFound`.
    ///
    /// Pure function over its inputs, no device I/O.
    pub fn find_match(
        &self,
        screen: &GrayImage,
        template: &Template,
    ) -> Result<MatchResult, MatchError> {
        let (screen_width, screen_height) = screen.dimensions();
        let (template_width, template_height) = (template.width(), template.height());

        if template_width > screen_width || template_height > screen_height {
            return Err(MatchError::TemplateLargerThanScreen {
                template_width,
                template_height,
                screen_width,
                screen_height,
            });
        }

        let stats = TemplateStats::compute(template.image());

        let x_max = screen_width - template_width;
        let y_max = screen_height - template_height;
        let total_positions = ((x_max + 1) * (y_max + 1)) as usize;
        let report_interval = (total_positions / 10).max(1);
        let mut position_count = 0usize;

        let mut best_score = f64::NEG_INFINITY;
        let mut best_anchor = Point::new(0, 0);

        for y in 0..=y_max {
            for x in 0..=x_max {
                let score = correlation_at(screen, x, y, &stats);
                if score > best_score {
                    best_score = score;
                    best_anchor = Point::new(x, y);
                }

                position_count += 1;
                if position_count % report_interval == 0 {
                    log::trace!(
                        "Correlation scan {}% (best so far {:.3})",
                        position_count * 100 / total_positions,
                        best_score
                    );
                }
            }
        }

        if (best_score as f32) < self.config.score_threshold {
            log::debug!(
                "Best score {:.3} for '{}' below threshold {:.2}",
                best_score,
                template.name(),
                self.config.score_threshold
            );
            return Ok(MatchResult::NotFound);
        }

        Ok(MatchResult::Found {
            anchor: best_anchor,
            score: best_score as f32,
        })
    }
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

/// Position-independent template statistics, computed once per pass.
struct TemplateStats {
    width: u32,
    height: u32,
    /// Pixel values with the template mean subtracted, row-major.
    centered: Vec<f64>,
    /// Sum of squared deviations from the mean.
    sum_sq_dev: f64,
}

impl TemplateStats {
    fn compute(image: &GrayImage) -> Self {
        let pixel_count = (image.width() * image.height()) as f64;
        let sum: f64 = image.pixels().map(|p| p.0[0] as f64).sum();
        let mean = sum / pixel_count;

        let centered: Vec<f64> = image.pixels().map(|p| p.0[0] as f64 - mean).collect();
        let sum_sq_dev = centered.iter().map(|v| v * v).sum();

        Self {
            width: image.width(),
            height: image.height(),
            centered,
            sum_sq_dev,
        }
    }
}

/// Zero-mean normalized cross-correlation between the template and the
/// screen region anchored at (x, y).
///
/// With the template pre-centered the numerator reduces to a single dot
/// product, so one pass over the region suffices. A flat template or a flat
/// region has an undefined denominator and scores 0.0.
fn correlation_at(screen: &GrayImage, x: u32, y: u32, stats: &TemplateStats) -> f64 {
    let pixel_count = (stats.width * stats.height) as f64;

    let mut region_sum = 0.0f64;
    let mut region_sum_sq = 0.0f64;
    let mut cross = 0.0f64;

    let mut idx = 0usize;
    for dy in 0..stats.height {
        for dx in 0..stats.width {
            let value = screen.get_pixel(x + dx, y + dy).0[0] as f64;
            region_sum += value;
            region_sum_sq += value * value;
            cross += stats.centered[idx] * value;
            idx += 1;
        }
    }

    let region_sum_sq_dev = region_sum_sq - region_sum * region_sum / pixel_count;
    let denom_sq = stats.sum_sq_dev * region_sum_sq_dev;
    if denom_sq <= 0.0 {
        return 0.0;
    }

    (cross / denom_sq.sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Deterministic pseudo-noise frame.
    fn noise_screen(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let v = x
                .wrapping_mul(2_654_435_761)
                .wrapping_add(y.wrapping_mul(40_503))
                .wrapping_add(x.wrapping_mul(y).wrapping_mul(97));
            Luma([(v >> 7) as u8])
        })
    }

    /// 10x10 textured patch, distinct from the noise pattern.
    fn blob_template() -> Template {
        let image = GrayImage::from_fn(10, 10, |x, y| {
            Luma([if (x / 2 + y / 2) % 2 == 0 { 230 } else { 20 }])
        });
        Template::from_image("blob", image).unwrap()
    }

    fn paste(screen: &mut GrayImage, patch: &GrayImage, at_x: u32, at_y: u32) {
        for (dx, dy, pixel) in patch.enumerate_pixels() {
            screen.put_pixel(at_x + dx, at_y + dy, *pixel);
        }
    }

    #[test]
    fn test_exact_copy_found_at_anchor_with_perfect_score() {
        let template = blob_template();
        let mut screen = noise_screen(60, 60);
        paste(&mut screen, template.image(), 20, 30);

        let matcher = TemplateMatcher::default();
        match matcher.find_match(&screen, &template).unwrap() {
            MatchResult::Found { anchor, score } => {
                assert_eq!(anchor, Point::new(20, 30));
                assert!(score > 0.999, "exact copy should score ~1.0, got {score}");
            }
            MatchResult::NotFound => panic!("embedded template not found"),
        }
    }

    #[test]
    fn test_uniform_screen_reports_not_found() {
        let template = blob_template();
        let screen = GrayImage::from_pixel(60, 60, Luma([128]));

        let matcher = TemplateMatcher::default();
        let result = matcher.find_match(&screen, &template).unwrap();
        assert_eq!(result, MatchResult::NotFound);
    }

    #[test]
    fn test_anti_correlated_region_scores_minus_one() {
        // Horizontal ramp vs its inversion: exactly opposite deviations
        let screen = GrayImage::from_fn(40, 20, |x, _| Luma([(x * 6) as u8]));
        let inverted = GrayImage::from_fn(10, 10, |x, _| Luma([255 - (x * 6) as u8]));
        let template = Template::from_image("inverted-ramp", inverted).unwrap();

        let stats = TemplateStats::compute(template.image());
        let score = correlation_at(&screen, 0, 0, &stats);
        assert!(score < -0.999, "inverted ramp should score ~-1.0, got {score}");

        let matcher = TemplateMatcher::default();
        let result = matcher.find_match(&screen, &template).unwrap();
        assert_eq!(result, MatchResult::NotFound);
    }

    #[test]
    fn test_repeated_runs_are_bit_identical() {
        let template = blob_template();
        let mut screen = noise_screen(50, 50);
        paste(&mut screen, template.image(), 7, 13);

        let matcher = TemplateMatcher::default();
        let first = matcher.find_match(&screen, &template).unwrap();
        let second = matcher.find_match(&screen, &template).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tie_break_prefers_topmost_leftmost() {
        let template = blob_template();
        let mut screen = GrayImage::from_pixel(80, 80, Luma([0]));
        paste(&mut screen, template.image(), 5, 5);
        paste(&mut screen, template.image(), 50, 50);

        let matcher = TemplateMatcher::default();
        match matcher.find_match(&screen, &template).unwrap() {
            MatchResult::Found { anchor, .. } => assert_eq!(anchor, Point::new(5, 5)),
            MatchResult::NotFound => panic!("duplicated template not found"),
        }
    }

    #[test]
    fn test_template_larger_than_screen_is_an_error() {
        let screen = GrayImage::from_pixel(10, 10, Luma([0]));
        let template =
            Template::from_image("big", GrayImage::from_pixel(20, 20, Luma([0]))).unwrap();

        let matcher = TemplateMatcher::default();
        assert!(matches!(
            matcher.find_match(&screen, &template),
            Err(MatchError::TemplateLargerThanScreen {
                template_width: 20,
                template_height: 20,
                screen_width: 10,
                screen_height: 10,
            })
        ));
    }

    #[test]
    fn test_template_same_size_as_screen_matches_at_origin() {
        let template = blob_template();
        let screen = template.image().clone();

        let matcher = TemplateMatcher::default();
        match matcher.find_match(&screen, &template).unwrap() {
            MatchResult::Found { anchor, score } => {
                assert_eq!(anchor, Point::new(0, 0));
                assert!(score > 0.999);
            }
            MatchResult::NotFound => panic!("identical frame not matched"),
        }
    }

    #[test]
    fn test_threshold_filters_weak_matches() {
        let template = blob_template();
        let mut screen = noise_screen(60, 60);
        paste(&mut screen, template.image(), 20, 30);

        // An impossible threshold turns even a perfect match into NotFound
        let matcher = TemplateMatcher::new(MatchConfig::with_threshold(1.1));
        let result = matcher.find_match(&screen, &template).unwrap();
        assert_eq!(result, MatchResult::NotFound);
    }
}
