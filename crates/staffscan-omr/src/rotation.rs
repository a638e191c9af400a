//! Skew estimation and rotation normalization of binary pages.

use rayon::prelude::*;
use serde::Serialize;
use staffscan_image::Image;
use staffscan_imgproc::{
    core::row_sums,
    hough::{hough_lines, HoughParams},
    warp::rotate,
};

use crate::{
    config::{SkewConfig, SkewMethod},
    error::OmrError,
};

/// Estimated skew of a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkewEstimate {
    /// Rotation in degrees that levels the staff lines, rounded to two decimals.
    ///
    /// Positive when the lines descend to the right.
    pub angle_deg: f32,
    /// Number of lines or tried rotations the estimate is based on.
    pub samples: usize,
    /// No qualifying line was found and the angle defaulted to zero.
    pub degraded: bool,
}

impl SkewEstimate {
    fn degraded() -> Self {
        Self {
            angle_deg: 0.0,
            samples: 0,
            degraded: true,
        }
    }
}

fn round_hundredths(angle: f32) -> f32 {
    (angle * 100.0).round() / 100.0
}

fn median(sorted: &[f32]) -> Option<f32> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

fn estimate_hough_median(src: &Image<u8, 1>, config: &SkewConfig) -> SkewEstimate {
    let params = HoughParams {
        rho_resolution: 1.0,
        theta_resolution: config.theta_resolution_deg.to_radians(),
        threshold: (config.min_line_length_ratio * src.width() as f32) as usize,
    };

    let mut angles: Vec<f32> = hough_lines(src, params)
        .iter()
        .map(|line| line.skew_degrees())
        .filter(|angle| angle.abs() <= config.max_skew_deg)
        .collect();
    angles.sort_by(f32::total_cmp);

    match median(&angles) {
        Some(angle) => SkewEstimate {
            angle_deg: round_hundredths(angle),
            samples: angles.len(),
            degraded: false,
        },
        None => SkewEstimate::degraded(),
    }
}

/// Sum of the squared differences between consecutive row sums.
fn profile_score(src: &Image<u8, 1>) -> f64 {
    row_sums(src)
        .windows(2)
        .map(|w| {
            let d = w[1] as f64 - w[0] as f64;
            d * d
        })
        .sum()
}

fn estimate_projection_profile(
    src: &Image<u8, 1>,
    limit_deg: f32,
    step_deg: f32,
    fill: u8,
) -> Result<SkewEstimate, OmrError> {
    let steps = (2.0 * limit_deg / step_deg).floor() as usize + 1;
    let angles: Vec<f32> = (0..steps)
        .map(|i| -limit_deg + i as f32 * step_deg)
        .collect();

    let scores = angles
        .par_iter()
        .map(|&angle| {
            let mut rotated = Image::from_size_val(src.size(), 0u8)?;
            rotate(src, &mut rotated, angle, [fill])?;
            Ok(profile_score(&rotated))
        })
        .collect::<Result<Vec<f64>, OmrError>>()?;

    // ties go to the smallest rotation
    let mut best: Option<(f32, f64)> = None;
    for (&angle, &score) in angles.iter().zip(&scores) {
        let better = match best {
            None => true,
            Some((best_angle, best_score)) => {
                score > best_score || (score == best_score && angle.abs() < best_angle.abs())
            }
        };
        if better {
            best = Some((angle, score));
        }
    }

    Ok(match best {
        Some((angle, score)) if score > 0.0 => SkewEstimate {
            angle_deg: round_hundredths(angle),
            samples: steps,
            degraded: false,
        },
        _ => SkewEstimate::degraded(),
    })
}

/// Estimate the skew of a binary page.
///
/// With [`SkewMethod::HoughMedian`] the estimate is the median angle of the
/// Hough lines with more votes than `min_line_length_ratio` of the page width
/// and at most `max_skew_deg` away from horizontal. With
/// [`SkewMethod::ProjectionProfile`] it is the rotation giving the sharpest
/// horizontal projection profile.
///
/// A page without any qualifying line gives a zero, degraded estimate.
///
/// # Examples
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_omr::config::SkewConfig;
/// use staffscan_omr::rotation::estimate_skew;
///
/// let (width, height) = (100, 40);
/// let mut data = vec![0u8; width * height];
/// data[20 * width..21 * width].fill(255);
/// let page = Image::<u8, 1>::new(ImageSize { width, height }, data).unwrap();
///
/// let estimate = estimate_skew(&page, &SkewConfig::default()).unwrap();
/// assert_eq!(estimate.angle_deg, 0.0);
/// assert!(!estimate.degraded);
/// ```
pub fn estimate_skew(src: &Image<u8, 1>, config: &SkewConfig) -> Result<SkewEstimate, OmrError> {
    let estimate = match config.method {
        SkewMethod::HoughMedian => estimate_hough_median(src, config),
        SkewMethod::ProjectionProfile {
            limit_deg,
            step_deg,
        } => estimate_projection_profile(src, limit_deg, step_deg, config.fill)?,
    };

    if estimate.degraded {
        log::warn!("no line qualified for the skew estimate, keeping the page as is");
    } else {
        log::debug!(
            "skew estimate {:.2} deg from {} samples",
            estimate.angle_deg,
            estimate.samples
        );
    }

    Ok(estimate)
}

/// Estimate the skew of a binary page and rotate it so the staff lines are level.
///
/// The output keeps the input size; uncovered areas take `config.fill`.
/// Sampling is nearest neighbor, so hairline staff lines do not survive a
/// rotation in one piece (see [`SkewConfig`]).
pub fn normalize_rotation(
    src: &Image<u8, 1>,
    config: &SkewConfig,
) -> Result<(Image<u8, 1>, SkewEstimate), OmrError> {
    let estimate = estimate_skew(src, config)?;
    let mut leveled = Image::from_size_val(src.size(), config.fill)?;
    rotate(src, &mut leveled, estimate.angle_deg, [config.fill])?;
    Ok((leveled, estimate))
}
