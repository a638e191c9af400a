use staffscan_image::{Image, ImageError};

use crate::parallel;

fn check_same_size<T1, T2, const C: usize>(
    a: &Image<T1, C>,
    b: &Image<T2, C>,
) -> Result<(), ImageError> {
    if a.size() != b.size() {
        return Err(ImageError::InvalidImageSize(
            a.cols(),
            a.rows(),
            b.cols(),
            b.rows(),
        ));
    }
    Ok(())
}

/// Compute the per-pixel bitwise OR of two masks.
///
/// # Arguments
///
/// * `src1` - The first input mask.
/// * `src2` - The second input mask.
/// * `dst` - The output mask.
///
/// # Examples
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_imgproc::core::bitwise_or;
///
/// let size = ImageSize { width: 2, height: 1 };
/// let a = Image::<u8, 1>::new(size, vec![255, 0]).unwrap();
/// let b = Image::<u8, 1>::new(size, vec![0, 255]).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(size, 0).unwrap();
///
/// bitwise_or(&a, &b, &mut dst).unwrap();
/// assert_eq!(dst.as_slice(), &[255, 255]);
/// ```
pub fn bitwise_or<const C: usize>(
    src1: &Image<u8, C>,
    src2: &Image<u8, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    check_same_size(src1, src2)?;
    check_same_size(src1, dst)?;

    parallel::par_iter_rows_val_two(src1, src2, dst, |&a, &b, out| {
        *out = a | b;
    });

    Ok(())
}

/// Clear from `src` every pixel that is set in `mask`.
///
/// This is `src & !mask`, the ink-on-black equivalent of painting the mask
/// over the image with the background color.
pub fn bitwise_and_not<const C: usize>(
    src: &Image<u8, C>,
    mask: &Image<u8, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    check_same_size(src, mask)?;
    check_same_size(src, dst)?;

    parallel::par_iter_rows_val_two(src, mask, dst, |&a, &m, out| {
        *out = a & !m;
    });

    Ok(())
}

/// Number of foreground (non-zero) pixels in every column of a single channel image.
///
/// # Examples
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_imgproc::core::column_sums;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 3, height: 2 },
///     vec![255, 0, 255, 255, 0, 0],
/// ).unwrap();
///
/// assert_eq!(column_sums(&image), vec![2, 0, 1]);
/// ```
pub fn column_sums(src: &Image<u8, 1>) -> Vec<usize> {
    let mut sums = vec![0usize; src.cols()];
    if src.cols() == 0 {
        return sums;
    }
    for row in src.as_slice().chunks_exact(src.cols()) {
        for (sum, &px) in sums.iter_mut().zip(row) {
            if px != 0 {
                *sum += 1;
            }
        }
    }
    sums
}

/// Number of foreground (non-zero) pixels in every row of a single channel image.
pub fn row_sums(src: &Image<u8, 1>) -> Vec<usize> {
    if src.cols() == 0 {
        return vec![0; src.rows()];
    }
    src.as_slice()
        .chunks_exact(src.cols())
        .map(|row| row.iter().filter(|&&px| px != 0).count())
        .collect()
}

/// Number of foreground pixels in row `y` restricted to the columns `[x0, x1)`.
///
/// Columns past the image width are ignored; a row outside the image sums to zero.
pub fn row_sum_in(src: &Image<u8, 1>, y: usize, x0: usize, x1: usize) -> usize {
    if y >= src.rows() {
        return 0;
    }
    let x1 = x1.min(src.cols());
    if x0 >= x1 {
        return 0;
    }
    let start = y * src.cols();
    src.as_slice()[start + x0..start + x1]
        .iter()
        .filter(|&&px| px != 0)
        .count()
}

/// Number of foreground pixels in column `x` restricted to the rows `[y0, y1)`.
pub fn column_sum_in(src: &Image<u8, 1>, x: usize, y0: usize, y1: usize) -> usize {
    if x >= src.cols() {
        return 0;
    }
    let y1 = y1.min(src.rows());
    (y0..y1)
        .filter(|&y| src.as_slice()[y * src.cols() + x] != 0)
        .count()
}
