//! Connected component extraction of the line and glyph masks.

use staffscan_image::{Image, ImageSize};
use staffscan_imgproc::{
    components::{connected_components, filter_components_by_area, BoundingBox, Connectivity},
    crop::crop_image,
};

use crate::{config::AreaWindow, error::OmrError, glyph::NoteGlyph, staff::StaffLineSegment};

/// Keep the components of a mask whose area lies in `window`.
///
/// Returns the filtered mask, with 255 on kept pixels, together with the
/// boxes of the kept components in raster order of their first pixel.
/// Filtering an already filtered mask with the same window changes nothing.
///
/// # Examples
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_omr::config::AreaWindow;
/// use staffscan_omr::extract::extract_components;
///
/// let mask = Image::<u8, 1>::new(
///     ImageSize { width: 5, height: 2 },
///     vec![255, 255, 0, 0, 255, 255, 255, 0, 0, 0],
/// ).unwrap();
///
/// let (kept, boxes) = extract_components(&mask, AreaWindow::new(2, 10)).unwrap();
/// assert_eq!(boxes.len(), 1);
/// assert_eq!(kept.as_slice()[4], 0);
/// ```
pub fn extract_components(
    mask: &Image<u8, 1>,
    window: AreaWindow,
) -> Result<(Image<u8, 1>, Vec<BoundingBox>), OmrError> {
    let labels = connected_components(mask, Connectivity::Eight)?;

    let mut kept = Image::from_size_val(mask.size(), 0u8)?;
    filter_components_by_area(&labels, window.min, window.max, &mut kept)?;

    let boxes: Vec<BoundingBox> = labels
        .stats
        .iter()
        .filter(|stats| window.contains(stats.area))
        .map(|stats| stats.bbox)
        .collect();

    log::debug!(
        "kept {} of {} components with area in [{}, {}]",
        boxes.len(),
        labels.stats.len(),
        window.min,
        window.max
    );

    Ok((kept, boxes))
}

/// Staff line segments of the horizontal mask, sorted top to bottom.
pub fn extract_staff_line_segments(
    horizontal: &Image<u8, 1>,
    window: AreaWindow,
) -> Result<Vec<StaffLineSegment>, OmrError> {
    let (_, boxes) = extract_components(horizontal, window)?;
    let mut segments: Vec<StaffLineSegment> =
        boxes.into_iter().map(StaffLineSegment::from).collect();
    segments.sort_by_key(|s| (s.y, s.x_start));
    Ok(segments)
}

/// Glyph candidates of the glyph raster, sorted left to right.
///
/// Every candidate carries the crop of the filtered raster under its box, so
/// neighboring glyphs do not leak into it.
pub fn extract_glyphs(glyphs: &Image<u8, 1>, window: AreaWindow) -> Result<Vec<NoteGlyph>, OmrError> {
    let (kept, mut boxes) = extract_components(glyphs, window)?;
    boxes.sort_by_key(|b| (b.x, b.y));

    boxes
        .into_iter()
        .map(|bbox| {
            let mut crop = Image::from_size_val(
                ImageSize {
                    width: bbox.width,
                    height: bbox.height,
                },
                0u8,
            )?;
            crop_image(&kept, &mut crop, bbox.x, bbox.y)?;
            Ok(NoteGlyph::new(bbox, crop))
        })
        .collect()
}
