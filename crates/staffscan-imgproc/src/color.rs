use staffscan_image::{Image, ImageError};

use crate::parallel;

/// Define the RGB weights for the grayscale conversion.
const RW: f32 = 0.299;
const GW: f32 = 0.587;
const BW: f32 = 0.114;

fn check_size<const C1: usize, const C2: usize>(
    src: &Image<u8, C1>,
    dst: &Image<u8, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Convert an RGB8 image to grayscale using the formula:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// # Example
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_imgproc::color::gray_from_rgb;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize { width: 1, height: 1 },
///     vec![255, 255, 255],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255]);
/// ```
pub fn gray_from_rgb(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    check_size(src, dst)?;

    // parallelize the grayscale conversion by rows
    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as f32;
        let g = src_pixel[1] as f32;
        let b = src_pixel[2] as f32;
        dst_pixel[0] = (RW * r + GW * g + BW * b).round().clamp(0.0, 255.0) as u8;
    });

    Ok(())
}

/// Convert an RGBA8 image to grayscale, ignoring the alpha channel.
pub fn gray_from_rgba(src: &Image<u8, 4>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    check_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as f32;
        let g = src_pixel[1] as f32;
        let b = src_pixel[2] as f32;
        dst_pixel[0] = (RW * r + GW * g + BW * b).round().clamp(0.0, 255.0) as u8;
    });

    Ok(())
}
