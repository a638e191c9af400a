#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use staffscan_image as image;

#[doc(inline)]
pub use staffscan_imgproc as imgproc;

#[doc(inline)]
pub use staffscan_omr as omr;
