use staffscan_image::{Image, ImageError};

fn check_size<T1, T2>(src: &Image<T1, 1>, dst: &Image<T2, 1>) -> Result<(), ImageError> {
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

/// Summed-area table with one extra leading row and column of zeros.
fn integral_image(src: &Image<u8, 1>) -> Vec<u64> {
    let (w, h) = (src.cols(), src.rows());
    let mut table = vec![0u64; (w + 1) * (h + 1)];
    let data = src.as_slice();
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += data[y * w + x] as u64;
            table[(y + 1) * (w + 1) + x + 1] = table[y * (w + 1) + x + 1] + row_sum;
        }
    }
    table
}

/// Inverse adaptive mean threshold, used to extract dark ink from a bright page.
///
/// A pixel becomes `max_value` when it is not brighter than the mean of its
/// `block_size x block_size` neighborhood minus `offset`, and zero otherwise.
/// The neighborhood is clipped at the image border.
///
/// # Arguments
///
/// * `src` - The grayscale input image.
/// * `dst` - The binary output image.
/// * `block_size` - Side of the averaging window, must be odd and larger than 1.
/// * `offset` - Constant subtracted from the local mean.
/// * `max_value` - Value assigned to ink pixels.
///
/// # Examples
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_imgproc::threshold::adaptive_threshold_mean_inverse;
///
/// let mut data = vec![240u8; 9 * 9];
/// data[4 * 9 + 4] = 10;
/// let page = Image::<u8, 1>::new(ImageSize { width: 9, height: 9 }, data).unwrap();
/// let mut ink = Image::<u8, 1>::from_size_val(page.size(), 0).unwrap();
///
/// adaptive_threshold_mean_inverse(&page, &mut ink, 5, 10, 255).unwrap();
/// assert_eq!(ink.as_slice().iter().filter(|&&v| v == 255).count(), 1);
/// ```
pub fn adaptive_threshold_mean_inverse(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    block_size: usize,
    offset: i32,
    max_value: u8,
) -> Result<(), ImageError> {
    check_size(src, dst)?;

    if block_size < 3 || block_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(block_size));
    }

    let (w, h) = (src.cols(), src.rows());
    let table = integral_image(src);
    let radius = block_size / 2;
    let src_data = src.as_slice();

    for (i, out) in dst.as_slice_mut().iter_mut().enumerate() {
        let (x, y) = (i % w, i / w);
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius + 1).min(w);
        let y1 = (y + radius + 1).min(h);

        let sum = table[y1 * (w + 1) + x1] + table[y0 * (w + 1) + x0]
            - table[y0 * (w + 1) + x1]
            - table[y1 * (w + 1) + x0];
        let count = ((x1 - x0) * (y1 - y0)) as f32;
        let mean = sum as f32 / count;

        *out = if src_data[i] as f32 <= mean - offset as f32 {
            max_value
        } else {
            0
        };
    }

    Ok(())
}
