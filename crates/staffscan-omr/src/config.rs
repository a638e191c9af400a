use serde::{Deserialize, Serialize};

use crate::error::OmrError;

/// Inclusive pixel area window used to keep connected components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaWindow {
    /// Smallest area kept.
    pub min: usize,
    /// Largest area kept.
    pub max: usize,
}

impl AreaWindow {
    /// Create a new area window.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Whether `area` lies inside the window, bounds included.
    pub fn contains(&self, area: usize) -> bool {
        area >= self.min && area <= self.max
    }
}

/// Size of a rectangular structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSize {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

/// Strategy used to estimate the page skew.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SkewMethod {
    /// Median angle of the long, near-horizontal Hough lines.
    HoughMedian,
    /// Exhaustive search of the rotation that maximizes the sharpness of the
    /// horizontal projection profile.
    ProjectionProfile {
        /// Largest rotation tried in each direction, in degrees.
        limit_deg: f32,
        /// Step between two tried rotations, in degrees.
        step_deg: f32,
    },
}

/// Configuration of the rotation normalization.
///
/// Staff lines are expected to be at least two pixels thick. A tilted one
/// pixel line spreads its Hough votes over neighboring distance cells and
/// may miss `min_line_length_ratio`, and leveling it with nearest neighbor
/// sampling breaks it into short pieces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewConfig {
    /// How the skew is estimated.
    pub method: SkewMethod,
    /// Minimum Hough votes as a fraction of the image width.
    pub min_line_length_ratio: f32,
    /// Hough lines further than this from horizontal are ignored, in degrees.
    pub max_skew_deg: f32,
    /// Angular resolution of the Hough accumulator, in degrees.
    pub theta_resolution_deg: f32,
    /// Value written in the areas uncovered by the rotation.
    pub fill: u8,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            method: SkewMethod::HoughMedian,
            min_line_length_ratio: 0.6,
            max_skew_deg: 45.0,
            theta_resolution_deg: 0.5,
            fill: 0,
        }
    }
}

/// Configuration of the horizontal and vertical line extraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// The horizontal kernel is `width / horizontal_divisor` pixels long.
    pub horizontal_divisor: usize,
    /// The vertical kernel is `height / vertical_divisor` pixels tall.
    pub vertical_divisor: usize,
    /// Closing applied to the glyphs once the staff lines are removed.
    pub repair_close: KernelSize,
    /// Opening applied after `repair_close`.
    pub repair_open: KernelSize,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            horizontal_divisor: 30,
            vertical_divisor: 30,
            repair_close: KernelSize {
                width: 1,
                height: 2,
            },
            repair_open: KernelSize {
                width: 1,
                height: 3,
            },
        }
    }
}

/// Thresholds of the stem detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StemConfig {
    /// A stem column holds more ink than this fraction of the glyph height.
    pub thick_column_ratio: f32,
    /// Columns right of the stem with more ink than this belong to a flag.
    pub flag_column_threshold: usize,
    /// Rows of the stem band with more ink than this belong to the stem.
    pub row_threshold: usize,
    /// Stems wider than this fraction of their height are rejected.
    pub max_aspect_ratio: f32,
    /// Stems wider than this fraction of the glyph width are rejected.
    pub max_width_ratio: f32,
    /// A stem is flagged when its row ink varies by more than this factor of
    /// its thinnest row.
    pub flag_swing_factor: f32,
}

impl Default for StemConfig {
    fn default() -> Self {
        Self {
            thick_column_ratio: 0.5,
            flag_column_threshold: 5,
            row_threshold: 3,
            max_aspect_ratio: 0.9,
            max_width_ratio: 0.7,
            flag_swing_factor: 2.0,
        }
    }
}

/// Thresholds of the note head detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    /// Rows and columns with more ink than this belong to the head.
    pub threshold: usize,
    /// The center row and column of an open head hold less ink than this
    /// fraction of the head size.
    pub open_ratio: f32,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            threshold: 5,
            open_ratio: 0.5,
        }
    }
}

/// Configuration of the grayscale binarization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizeConfig {
    /// Side of the averaging window, odd and larger than 1.
    pub block_size: usize,
    /// Ink must be darker than the local mean by at least this much.
    pub offset: i32,
}

impl Default for BinarizeConfig {
    fn default() -> Self {
        Self {
            block_size: 51,
            offset: 10,
        }
    }
}

/// Configuration of the whole recognition pipeline.
///
/// Every field has a default tuned for pages scanned around 1200 pixels wide.
/// Partial JSON documents are accepted, missing fields take their default.
///
/// # Examples
///
/// ```
/// use staffscan_omr::OmrConfig;
///
/// let mut config = OmrConfig::default();
/// config.group_gap_factor = 4.0;
/// assert!(config.validate().is_ok());
///
/// config.glyph_area.min = 10_000;
/// assert!(config.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmrConfig {
    /// Rotation normalization.
    pub skew: SkewConfig,
    /// Horizontal and vertical line extraction.
    pub lines: LineConfig,
    /// Area window of the glyph components.
    pub glyph_area: AreaWindow,
    /// Area window of the staff line segments.
    pub staff_line_area: AreaWindow,
    /// A staff ends where the gap to the next segment exceeds this many
    /// average gaps.
    pub group_gap_factor: f32,
    /// Vertical tolerance of the glyph assignment, in line spacings.
    pub margin_factor: f32,
    /// Stem detection.
    pub stem: StemConfig,
    /// Head detection.
    pub head: HeadConfig,
    /// Label the left-most glyph of every staff as a clef.
    pub leading_clef: bool,
    /// Binarization of grayscale pages.
    pub binarize: BinarizeConfig,
}

impl Default for OmrConfig {
    fn default() -> Self {
        Self {
            skew: SkewConfig::default(),
            lines: LineConfig::default(),
            glyph_area: AreaWindow::new(150, 5000),
            staff_line_area: AreaWindow::new(500, 400_000),
            group_gap_factor: 3.0,
            margin_factor: 1.0,
            stem: StemConfig::default(),
            head: HeadConfig::default(),
            leading_clef: true,
            binarize: BinarizeConfig::default(),
        }
    }
}

impl OmrConfig {
    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`OmrError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), OmrError> {
        fn invalid(msg: &str) -> Result<(), OmrError> {
            Err(OmrError::InvalidConfig(msg.to_string()))
        }
        // false for NaN as well
        fn positive(v: f32) -> bool {
            v > 0.0
        }
        fn non_negative(v: f32) -> bool {
            v >= 0.0
        }

        if self.glyph_area.min > self.glyph_area.max {
            return invalid("glyph_area.min is larger than glyph_area.max");
        }
        if self.staff_line_area.min > self.staff_line_area.max {
            return invalid("staff_line_area.min is larger than staff_line_area.max");
        }
        if self.lines.horizontal_divisor == 0 || self.lines.vertical_divisor == 0 {
            return invalid("line kernel divisors must be positive");
        }
        if !positive(self.group_gap_factor) {
            return invalid("group_gap_factor must be positive");
        }
        if !non_negative(self.margin_factor) {
            return invalid("margin_factor must not be negative");
        }
        if !positive(self.skew.theta_resolution_deg) {
            return invalid("skew.theta_resolution_deg must be positive");
        }
        if !non_negative(self.skew.max_skew_deg) {
            return invalid("skew.max_skew_deg must not be negative");
        }
        if let SkewMethod::ProjectionProfile {
            limit_deg,
            step_deg,
        } = self.skew.method
        {
            if !positive(step_deg) || !non_negative(limit_deg) {
                return invalid("projection profile needs a positive step and limit");
            }
        }
        if self.binarize.block_size < 3 || self.binarize.block_size % 2 == 0 {
            return invalid("binarize.block_size must be odd and at least 3");
        }
        Ok(())
    }
}
