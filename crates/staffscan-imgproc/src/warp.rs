//! Geometric image transformations.
//!
//! Rotations are applied with nearest neighbor (order 0) sampling so binary
//! rasters stay binary. Pixels of the output that map outside the source are
//! set to a fill value.
//!
//! # Examples
//!
//! Rotating an image by 45 degrees about its center:
//!
//! ```
//! use staffscan_image::{Image, ImageSize};
//! use staffscan_imgproc::warp::rotate;
//!
//! let src = Image::<u8, 1>::from_size_val(ImageSize { width: 16, height: 16 }, 255).unwrap();
//! let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
//!
//! rotate(&src, &mut dst, 45.0, [0]).unwrap();
//! assert_eq!(dst.get([0, 0, 0]), Some(&0));
//! assert_eq!(dst.get([8, 8, 0]), Some(&255));
//! ```

use rayon::prelude::*;
use staffscan_image::{Image, ImageError};

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    // a singular matrix maps everything to the origin
    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Returns a 2x3 rotation matrix for a 2D rotation around a center point.
///
/// The rotation matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x - beta * center.y
/// ty = beta * center.x + (1 - alpha) * center.y
///
/// A positive angle rotates the image content counter-clockwise as displayed
/// (y axis pointing down).
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees.
/// * `scale` - The scale factor.
pub fn get_rotation_matrix2d(center: (f32, f32), angle: f32, scale: f32) -> [f32; 6] {
    let angle = angle.to_radians();
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (1.0 - alpha) * center.1;

    [alpha, beta, tx, -beta, alpha, ty]
}

/// Applies an affine transformation to a point.
fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image with nearest neighbor sampling.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image; its size defines the output canvas.
/// * `m` - The 2x3 affine transformation matrix mapping `src` to `dst`.
/// * `fill` - Value written where the output maps outside `src`.
pub fn warp_affine_nearest<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &[f32; 6],
    fill: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }
    let (src_cols, src_rows) = (src.cols() as isize, src.rows() as isize);
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(y, dst_row)| {
            dst_row
                .chunks_exact_mut(C)
                .enumerate()
                .for_each(|(x, dst_pixel)| {
                    let (u, v) = transform_point(x as f32, y as f32, &m_inv);
                    let (iu, iv) = (u.round() as isize, v.round() as isize);
                    if iu >= 0 && iu < src_cols && iv >= 0 && iv < src_rows {
                        let base = (iv * src_cols + iu) as usize * C;
                        dst_pixel.copy_from_slice(&src_data[base..base + C]);
                    } else {
                        dst_pixel.copy_from_slice(&fill);
                    }
                });
        });

    Ok(())
}

/// Rotate an image about its center, keeping the original canvas size.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `angle` - Counter-clockwise rotation in degrees.
/// * `fill` - Value written in the areas uncovered by the rotation.
pub fn rotate<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    angle: f32,
    fill: [T; C],
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    if angle == 0.0 {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let center = (
        (src.cols() as f32 - 1.0) / 2.0,
        (src.rows() as f32 - 1.0) / 2.0,
    );
    let m = get_rotation_matrix2d(center, angle, 1.0);
    warp_affine_nearest(src, dst, &m, fill)
}
