use rayon::prelude::*;
use staffscan_image::Image;

/// A line in normal (Hesse) form `x * cos(theta) + y * sin(theta) = rho`.
///
/// A horizontal line has `theta = pi / 2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarLine {
    /// Signed distance of the line to the origin in pixels.
    pub rho: f32,
    /// Angle of the line normal in radians, in `[0, pi)`.
    pub theta: f32,
    /// Number of foreground pixels voting for the line.
    pub votes: usize,
}

impl PolarLine {
    /// Angle of the line direction against the horizontal axis, in degrees.
    ///
    /// Positive values mean the line descends to the right in raster coordinates.
    pub fn skew_degrees(&self) -> f32 {
        self.theta.to_degrees() - 90.0
    }
}

/// Parameters of the standard Hough line transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoughParams {
    /// Distance resolution of the accumulator in pixels.
    pub rho_resolution: f32,
    /// Angle resolution of the accumulator in radians.
    pub theta_resolution: f32,
    /// Minimum number of votes for a line to be reported (strictly more is required).
    pub threshold: usize,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho_resolution: 1.0,
            theta_resolution: std::f32::consts::PI / 360.0,
            threshold: 100,
        }
    }
}

/// Detect straight lines in a mask with the standard Hough transform.
///
/// Every foreground (non-zero) pixel votes for all the `(rho, theta)` cells of
/// the lines passing through it. Cells with more than `threshold` votes that
/// are local maxima of the accumulator are reported, strongest first.
///
/// # Arguments
///
/// * `src` - The input mask.
/// * `params` - The accumulator resolution and vote threshold.
///
/// # Examples
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_imgproc::hough::{hough_lines, HoughParams};
///
/// let mut data = vec![0u8; 40 * 20];
/// data[10 * 40..11 * 40].fill(255);
/// let mask = Image::<u8, 1>::new(ImageSize { width: 40, height: 20 }, data).unwrap();
///
/// let lines = hough_lines(&mask, HoughParams { threshold: 30, ..Default::default() });
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0].rho, 10.0);
/// ```
pub fn hough_lines(src: &Image<u8, 1>, params: HoughParams) -> Vec<PolarLine> {
    let width = src.width();
    let height = src.height();
    if width == 0 || height == 0 || params.rho_resolution <= 0.0 || params.theta_resolution <= 0.0
    {
        return Vec::new();
    }

    let points: Vec<(f32, f32)> = src
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(_, &px)| px != 0)
        .map(|(i, _)| ((i % width) as f32, (i / width) as f32))
        .collect();

    let num_angles = ((std::f32::consts::PI / params.theta_resolution).floor() as usize).max(1);
    let max_rho = ((width * width + height * height) as f32).sqrt().ceil();
    let num_rho = (2.0 * max_rho / params.rho_resolution).ceil() as usize + 1;
    let offset = (num_rho - 1) / 2;

    // one accumulator row per angle, filled independently
    let mut accum = vec![0usize; num_angles * num_rho];
    accum
        .par_chunks_exact_mut(num_rho)
        .enumerate()
        .for_each(|(k, row)| {
            let theta = k as f32 * params.theta_resolution;
            let (sin, cos) = theta.sin_cos();
            for &(x, y) in &points {
                let r = ((x * cos + y * sin) / params.rho_resolution).round() as isize
                    + offset as isize;
                if r >= 0 && (r as usize) < num_rho {
                    row[r as usize] += 1;
                }
            }
        });

    let at = |k: isize, r: isize| -> usize {
        if k < 0 || r < 0 || k as usize >= num_angles || r as usize >= num_rho {
            0
        } else {
            accum[k as usize * num_rho + r as usize]
        }
    };

    let mut lines = Vec::new();
    for k in 0..num_angles as isize {
        for r in 0..num_rho as isize {
            let votes = at(k, r);
            if votes > params.threshold
                && votes > at(k, r - 1)
                && votes >= at(k, r + 1)
                && votes > at(k - 1, r)
                && votes >= at(k + 1, r)
            {
                lines.push(PolarLine {
                    rho: (r - offset as isize) as f32 * params.rho_resolution,
                    theta: k as f32 * params.theta_resolution,
                    votes,
                });
            }
        }
    }

    lines.sort_by(|a, b| b.votes.cmp(&a.votes));
    lines
}
