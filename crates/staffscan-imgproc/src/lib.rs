#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// connected component labeling module.
pub mod components;

/// bitwise mask operations and projection profiles.
pub mod core;

/// image cropping module.
pub mod crop;

/// hough line transform module.
pub mod hough;

/// morphological operations module.
pub mod morphology;

/// module containing parallelization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;

/// union-find data structure used by the labeling.
pub mod union_find;

/// image geometric transformations module.
pub mod warp;
