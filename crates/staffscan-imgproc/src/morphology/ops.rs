use rayon::prelude::*;
use staffscan_image::{Image, ImageError};

use super::kernels::Kernel;

/// Replace every pixel by the reduction of its in-bounds neighborhood.
///
/// Neighbors that fall outside the image are skipped, which leaves structures
/// touching the border unaffected by the border itself. With `reflect` the
/// kernel is mirrored around its anchor, so that dilation undoes erosion for
/// even sized kernels too.
fn morph_reduce<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
    reflect: bool,
    reduce: impl Fn(T, T) -> T + Send + Sync,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }

    let width = src.width() as isize;
    let height = src.height() as isize;
    if width == 0 || height == 0 {
        return Ok(());
    }

    let offsets: Vec<(isize, isize)> = if reflect {
        kernel.offsets().iter().map(|&(dy, dx)| (-dy, -dx)).collect()
    } else {
        kernel.offsets()
    };
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(width as usize * C)
        .enumerate()
        .for_each(|(h, row_chunk)| {
            let h = h as isize;
            for w in 0..width {
                for c in 0..C {
                    let mut acc: Option<T> = None;
                    for &(dy, dx) in &offsets {
                        let py = h + dy;
                        let px = w + dx;
                        if py < 0 || py >= height || px < 0 || px >= width {
                            continue;
                        }
                        let val = src_data[((py * width + px) as usize) * C + c];
                        acc = Some(match acc {
                            None => val,
                            Some(v) => reduce(v, val),
                        });
                    }
                    let idx = w as usize * C + c;
                    // a kernel always covers its anchor, so `acc` is set
                    if let Some(v) = acc {
                        row_chunk[idx] = v;
                    }
                }
            }
        });

    Ok(())
}

/// Dilate an image using a [`Kernel`].
///
/// Each pixel is replaced by the maximum value in the neighborhood defined by
/// the kernel, which grows ink regions.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
pub fn dilate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + Ord,
{
    morph_reduce(src, dst, kernel, true, |a, b| a.max(b))
}

/// Erode an image using a [`Kernel`].
///
/// Each pixel is replaced by the minimum value in the neighborhood defined by
/// the kernel, which thins ink regions.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image (will be overwritten).
/// * `kernel` - The morphological structuring element ([`Kernel`]).
pub fn erode<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + Ord,
{
    morph_reduce(src, dst, kernel, false, |a, b| a.min(b))
}

/// Opening: erosion followed by dilation.
///
/// Removes objects that cannot contain the kernel.
pub fn open<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + Ord,
{
    let mut temp_img = src.clone();
    erode(src, &mut temp_img, kernel)?;
    dilate(&temp_img, dst, kernel)?;
    Ok(())
}

/// Closing: dilation followed by erosion.
///
/// Fills gaps smaller than the kernel.
pub fn close<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    kernel: &Kernel,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + Ord,
{
    let mut temp_img = src.clone();
    dilate(src, &mut temp_img, kernel)?;
    erode(&temp_img, dst, kernel)?;
    Ok(())
}
