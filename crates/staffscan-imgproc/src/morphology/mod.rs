//! Morphological image processing operations.
//!
//! Binary rasters in this workspace store ink as 255 and background as 0, so
//! dilation grows strokes and erosion thins them. An opening with a long thin
//! [`Kernel`] keeps only the strokes that contain the whole kernel, which is how
//! long horizontal and vertical lines are isolated.
//!
//! # Examples
//!
//! ```
//! use staffscan_image::{Image, ImageSize};
//! use staffscan_imgproc::morphology::{open, Kernel, KernelShape};
//!
//! let src = Image::<u8, 1>::from_size_val(ImageSize { width: 8, height: 4 }, 255).unwrap();
//! let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
//!
//! let kernel = Kernel::new(KernelShape::Rect { width: 5, height: 1 });
//! open(&src, &mut dst, &kernel).unwrap();
//! assert!(dst.as_slice().iter().all(|&v| v == 255));
//! ```

mod kernels;
mod ops;

pub use kernels::{box_kernel, cross_kernel, rect_kernel, Kernel, KernelShape};
pub use ops::{close, dilate, erode, open};
