//! Segmentation of a glyph crop into a note head and a stem.
//!
//! Both detectors work on ink projections of the crop: a stem is a band of
//! columns holding ink over most of the glyph height, and a head is the block
//! of rows and columns left of the stem that hold enough ink.

use staffscan_image::Image;
use staffscan_imgproc::{
    components::BoundingBox,
    core::{column_sum_in, column_sums, row_sum_in},
};

use crate::{
    config::{HeadConfig, StemConfig},
    glyph::{Head, Openness, Stem, StemKind},
};

/// Find the stem of a glyph.
///
/// The stem starts at the first column holding ink over more than
/// `thick_column_ratio` of the crop height, and ends at the last column after
/// it holding more than `flag_column_threshold` pixels, so a flag is part of
/// the stem band. Rows of the band holding more than `row_threshold` pixels
/// give its vertical extent.
///
/// Returns `None` when no column is thick enough, when the band has no
/// qualifying row, or when the band is too wide to be a stem.
pub fn detect_stem(crop: &Image<u8, 1>, config: &StemConfig) -> Option<Stem> {
    let (width, height) = (crop.width(), crop.height());
    if width == 0 || height == 0 {
        return None;
    }

    let columns = column_sums(crop);
    let thick = height as f32 * config.thick_column_ratio;
    let left = columns.iter().position(|&sum| sum as f32 > thick)?;
    let right = (left..width)
        .rev()
        .find(|&x| columns[x] > config.flag_column_threshold)
        .unwrap_or(left);
    let band_width = right - left + 1;

    let rows: Vec<(usize, usize)> = (0..height)
        .map(|y| (y, row_sum_in(crop, y, left, right + 1)))
        .filter(|&(_, sum)| sum > config.row_threshold)
        .collect();
    let (top, _) = *rows.first()?;
    let (bottom, _) = *rows.last()?;
    let band_height = bottom - top + 1;

    if band_width as f32 / band_height as f32 > config.max_aspect_ratio {
        return None;
    }
    if band_width as f32 > config.max_width_ratio * width as f32 {
        return None;
    }

    let thinnest = rows.iter().map(|&(_, sum)| sum).min()?;
    let thickest = rows.iter().map(|&(_, sum)| sum).max()?;
    let kind = if (thickest - thinnest) as f32 > config.flag_swing_factor * thinnest as f32 {
        StemKind::Flagged
    } else {
        StemKind::Plain
    };

    Some(Stem {
        bbox: BoundingBox {
            x: left,
            y: top,
            width: band_width,
            height: band_height,
        },
        kind,
    })
}

/// Find the note head of a glyph in the columns `[0, width_limit)`.
///
/// The head box spans the first to the last row and column of the region
/// holding more than `threshold` pixels. The head is open when both its
/// center row and its center column hold less ink than `open_ratio` of the
/// head width and height.
pub fn detect_head(crop: &Image<u8, 1>, width_limit: usize, config: &HeadConfig) -> Option<Head> {
    let limit = width_limit.min(crop.width());
    let height = crop.height();

    let columns: Vec<usize> = (0..limit)
        .filter(|&x| column_sum_in(crop, x, 0, height) > config.threshold)
        .collect();
    let rows: Vec<usize> = (0..height)
        .filter(|&y| row_sum_in(crop, y, 0, limit) > config.threshold)
        .collect();

    let (x0, x1) = (*columns.first()?, *columns.last()?);
    let (y0, y1) = (*rows.first()?, *rows.last()?);
    let bbox = BoundingBox {
        x: x0,
        y: y0,
        width: x1 - x0 + 1,
        height: y1 - y0 + 1,
    };

    let center_row = row_sum_in(crop, bbox.y_center(), bbox.x, bbox.right());
    let center_column = column_sum_in(crop, bbox.x_center(), bbox.y, bbox.bottom());
    let open = (center_row as f32) < config.open_ratio * bbox.width as f32
        && (center_column as f32) < config.open_ratio * bbox.height as f32;

    Some(Head {
        bbox,
        openness: if open {
            Openness::Open
        } else {
            Openness::Closed
        },
    })
}

/// Detect the head and the stem of a glyph crop.
///
/// The head is searched left of the stem when there is one, and in the whole
/// crop otherwise.
///
/// # Examples
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_omr::config::{HeadConfig, StemConfig};
/// use staffscan_omr::parts::segment_parts;
///
/// // a filled 18x13 block: a head without stem
/// let crop = Image::<u8, 1>::from_size_val(ImageSize { width: 18, height: 13 }, 255).unwrap();
/// let (head, stem) = segment_parts(&crop, &StemConfig::default(), &HeadConfig::default());
/// assert!(head.is_some());
/// assert!(stem.is_none());
/// ```
pub fn segment_parts(
    crop: &Image<u8, 1>,
    stem_config: &StemConfig,
    head_config: &HeadConfig,
) -> (Option<Head>, Option<Stem>) {
    let stem = detect_stem(crop, stem_config);
    let width_limit = stem.map_or(crop.width(), |s| s.bbox.x);
    let head = detect_head(crop, width_limit, head_config);
    (head, stem)
}
