//! Separation of a binary page into horizontal lines, vertical strokes and glyphs.

use staffscan_image::Image;
use staffscan_imgproc::{
    core::{bitwise_and_not, bitwise_or},
    morphology::{close, open, Kernel, KernelShape},
};

use crate::{config::LineConfig, error::OmrError};

/// The three masks derived from a leveled binary page.
#[derive(Debug, Clone)]
pub struct LineStructure {
    /// Ink belonging to long horizontal runs, the staff lines.
    pub horizontal: Image<u8, 1>,
    /// Ink belonging to long vertical runs, such as stems and bar lines.
    pub vertical: Image<u8, 1>,
    /// The page without the staff lines, repaired and with the vertical strokes restored.
    pub glyphs: Image<u8, 1>,
}

fn rect(width: usize, height: usize) -> Kernel {
    Kernel::new(KernelShape::Rect { width, height })
}

/// Extract the staff lines and the glyph raster of a leveled binary page.
///
/// The horizontal mask is the opening of the page with a `width /
/// horizontal_divisor` by 1 rectangle, the vertical mask the opening with a 1
/// by `height / vertical_divisor` rectangle. The glyph raster is the page
/// minus the horizontal mask, closed and opened with the repair kernels to
/// bridge the gaps left by the removed lines, then merged with the vertical
/// mask.
///
/// # Examples
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_omr::config::LineConfig;
/// use staffscan_omr::lines::extract_line_structure;
///
/// let (width, height) = (90, 90);
/// let mut data = vec![0u8; width * height];
/// data[10 * width..11 * width].fill(255);
/// let page = Image::<u8, 1>::new(ImageSize { width, height }, data).unwrap();
///
/// let structure = extract_line_structure(&page, &LineConfig::default()).unwrap();
/// assert_eq!(structure.horizontal, page);
/// assert!(structure.glyphs.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn extract_line_structure(
    src: &Image<u8, 1>,
    config: &LineConfig,
) -> Result<LineStructure, OmrError> {
    let horizontal_length = (src.width() / config.horizontal_divisor).max(1);
    let vertical_length = (src.height() / config.vertical_divisor).max(1);

    let mut horizontal = Image::from_size_val(src.size(), 0u8)?;
    open(src, &mut horizontal, &rect(horizontal_length, 1))?;

    let mut vertical = Image::from_size_val(src.size(), 0u8)?;
    open(src, &mut vertical, &rect(1, vertical_length))?;

    let mut without_lines = Image::from_size_val(src.size(), 0u8)?;
    bitwise_and_not(src, &horizontal, &mut without_lines)?;

    let mut closed = Image::from_size_val(src.size(), 0u8)?;
    close(
        &without_lines,
        &mut closed,
        &rect(config.repair_close.width, config.repair_close.height),
    )?;

    let mut repaired = Image::from_size_val(src.size(), 0u8)?;
    open(
        &closed,
        &mut repaired,
        &rect(config.repair_open.width, config.repair_open.height),
    )?;

    let mut glyphs = Image::from_size_val(src.size(), 0u8)?;
    bitwise_or(&repaired, &vertical, &mut glyphs)?;

    log::debug!(
        "line structure with {}x1 horizontal and 1x{} vertical kernels",
        horizontal_length,
        vertical_length
    );

    Ok(LineStructure {
        horizontal,
        vertical,
        glyphs,
    })
}
