/// Shapes of morphological `Kernels`.
///
/// All kernels are anchored at `(height / 2, width / 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelShape {
    /// A square box structuring element.
    Box {
        /// `size` - The side length of the square kernel (size x size).
        size: usize,
    },

    /// A rectangular structuring element.
    ///
    /// A `width x 1` rectangle isolates horizontal strokes and a `1 x height`
    /// rectangle isolates vertical strokes.
    Rect {
        /// The width of the rectangle.
        width: usize,
        /// The height of the rectangle.
        height: usize,
    },

    /// A cross (plus) shaped structuring element.
    Cross {
        /// `size` - The side length of the square cross kernel (size x size).
        size: usize,
    },
}

/// A morphological structuring element.
///
/// The kernel stores a binary mask where 1 marks the pixels included in the
/// operation and 0 the excluded ones.
///
/// # Example
///
/// ```rust
/// use staffscan_imgproc::morphology::{Kernel, KernelShape};
///
/// let kernel = Kernel::new(KernelShape::Rect { width: 5, height: 1 });
/// assert_eq!(kernel.width(), 5);
/// assert_eq!(kernel.height(), 1);
/// assert_eq!(kernel.anchor(), (0, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Kernel {
    /// Create a morphological kernel from a shape.
    ///
    /// Zero-sized dimensions are clamped to 1 so the kernel always has an anchor.
    pub fn new(shape: KernelShape) -> Self {
        match shape {
            KernelShape::Box { size } => box_kernel(size),
            KernelShape::Rect { width, height } => rect_kernel(width, height),
            KernelShape::Cross { size } => cross_kernel(size),
        }
    }

    /// Get a reference to the kernel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the width of the kernel.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of the kernel.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the anchor of the kernel as `(row, col)`.
    pub fn anchor(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }

    /// Offsets `(dy, dx)` of the active elements relative to the anchor.
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let (ay, ax) = self.anchor();
        let mut offsets = Vec::with_capacity(self.data.len());
        for kh in 0..self.height {
            for kw in 0..self.width {
                if self.data[kh * self.width + kw] == 1 {
                    offsets.push((kh as isize - ay as isize, kw as isize - ax as isize));
                }
            }
        }
        offsets
    }
}

/// Create a box structuring element of `size x size` ones.
pub fn box_kernel(size: usize) -> Kernel {
    rect_kernel(size, size)
}

/// Create a rectangular structuring element of `width x height` ones.
pub fn rect_kernel(width: usize, height: usize) -> Kernel {
    let width = width.max(1);
    let height = height.max(1);
    Kernel {
        data: vec![1u8; width * height],
        width,
        height,
    }
}

/// Create a cross structuring element with ones along the center row and column.
pub fn cross_kernel(size: usize) -> Kernel {
    let size = size.max(1);
    let mut data = vec![0u8; size * size];
    let mid = size / 2;

    // fill horizontal line
    for j in 0..size {
        data[mid * size + j] = 1;
    }

    // fill vertical line
    for i in 0..size {
        data[i * size + mid] = 1;
    }

    Kernel {
        data,
        width: size,
        height: size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_kernel() {
        let kernel = Kernel::new(KernelShape::Box { size: 3 });
        assert_eq!(kernel.width(), 3);
        assert_eq!(kernel.height(), 3);
        assert!(kernel.data().iter().all(|&x| x == 1));
    }

    #[test]
    fn test_cross_kernel() {
        let kernel = Kernel::new(KernelShape::Cross { size: 3 });
        let data = kernel.data();
        // center row
        assert_eq!(data[3], 1);
        assert_eq!(data[4], 1);
        assert_eq!(data[5], 1);
        // center column
        assert_eq!(data[1], 1);
        assert_eq!(data[7], 1);
        // corners
        assert_eq!(data[0], 0);
        assert_eq!(kernel.offsets().len(), 5);
    }

    #[test]
    fn test_rect_kernel_offsets() {
        let kernel = Kernel::new(KernelShape::Rect {
            width: 1,
            height: 2,
        });
        assert_eq!(kernel.anchor(), (1, 0));
        assert_eq!(kernel.offsets(), vec![(-1, 0), (0, 0)]);
    }

    #[test]
    fn test_zero_sized_kernel_is_clamped() {
        let kernel = Kernel::new(KernelShape::Rect {
            width: 0,
            height: 0,
        });
        assert_eq!(kernel.width(), 1);
        assert_eq!(kernel.height(), 1);
        assert_eq!(kernel.offsets(), vec![(0, 0)]);
    }
}
