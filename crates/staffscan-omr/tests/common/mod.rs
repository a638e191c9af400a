//! Synthetic binary sheets for the pipeline tests.
//!
//! Staves have five lines, one pixel thick unless set otherwise, with their
//! tops 14 pixels apart, from column 20 to 699.
//! Glyph shapes are kept narrower than the horizontal line kernel of a 720
//! pixel wide page so they never leak into the staff line mask.

#![allow(dead_code)]

use staffscan_image::{Image, ImageSize};
use staffscan_imgproc::warp::rotate;

pub const SPACING: usize = 14;
pub const STAFF_X: (usize, usize) = (20, 700);

/// Row of line `n` (1 to 5) of the staff starting at `top`.
pub fn line(top: usize, n: usize) -> usize {
    top + (n - 1) * SPACING
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Sheet {
    width: usize,
    height: usize,
    line_thickness: usize,
    data: Vec<u8>,
}

impl Sheet {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            line_thickness: 1,
            data: vec![0; width * height],
        }
    }

    /// Thickness of the staff lines drawn by the following `staff` calls.
    pub fn line_thickness(mut self, thickness: usize) -> Self {
        self.line_thickness = thickness;
        self
    }

    pub fn fill(mut self, x: usize, y: usize, w: usize, h: usize) -> Self {
        for yy in y..y + h {
            self.data[yy * self.width + x..yy * self.width + x + w].fill(255);
        }
        self
    }

    pub fn clear(mut self, x: usize, y: usize) -> Self {
        self.data[y * self.width + x] = 0;
        self
    }

    /// Five staff lines starting at row `top`.
    pub fn staff(mut self, top: usize) -> Self {
        for n in 1..=5 {
            let y = line(top, n);
            let thickness = self.line_thickness;
            self = self.fill(STAFF_X.0, y, STAFF_X.1 - STAFF_X.0, thickness);
        }
        self
    }

    /// A 10x70 block starting 7 rows above the staff, taller than the staff.
    pub fn clef(self, x: usize, top: usize) -> Self {
        self.fill(x, top - 7, 10, 70)
    }

    /// A filled oval with semi-axes 10 and 7 centered on `(cx, cy)`.
    pub fn oval(mut self, cx: usize, cy: usize) -> Self {
        let (a, b) = (10i64, 7i64);
        for dy in -b..=b {
            for dx in -a..=a {
                if dx * dx * b * b + dy * dy * a * a <= a * a * b * b {
                    let (x, y) = ((cx as i64 + dx) as usize, (cy as i64 + dy) as usize);
                    self.data[y * self.width + x] = 255;
                }
            }
        }
        self
    }

    /// A 14x11 filled head centered on row `head_y + 0.5`, with a 4 pixel
    /// stem rising 46 rows from its right side.
    ///
    /// The head keeps one background row to the neighboring staff lines, so
    /// only the lines crossing the stem are merged back into the glyph.
    pub fn quarter(self, x: usize, head_y: usize) -> Self {
        self.fill(x, head_y - 5, 14, 11).fill(x + 10, head_y - 40, 4, 46)
    }

    /// A quarter with a 10x10 flag at the top of the stem.
    pub fn eighth(self, x: usize, head_y: usize) -> Self {
        self.quarter(x, head_y).fill(x + 14, head_y - 40, 10, 10)
    }

    /// A 14x14 hollow head with 3 pixel walls centered on row `head_y`, with
    /// a 4 pixel stem rising 46 rows from its right side.
    pub fn half(self, x: usize, head_y: usize) -> Self {
        let head = head_y - 7;
        self.fill(x, head, 14, 3)
            .fill(x, head + 11, 14, 3)
            .fill(x, head, 3, 14)
            .fill(x + 11, head, 3, 14)
            .fill(x + 10, head + 13 - 45, 4, 46)
    }

    pub fn build(self) -> Image<u8, 1> {
        Image::new(
            ImageSize {
                width: self.width,
                height: self.height,
            },
            self.data,
        )
        .expect("sheet data matches its size")
    }

    /// The sheet turned counter-clockwise by `angle` degrees about its center.
    pub fn build_rotated(self, angle: f32) -> Image<u8, 1> {
        let level = self.build();
        let mut tilted = Image::from_size_val(level.size(), 0).expect("sheet size is valid");
        rotate(&level, &mut tilted, angle, [0]).expect("same size");
        tilted
    }

    /// The sheet as a grayscale scan: dark ink on white paper.
    pub fn build_gray(self) -> Image<u8, 1> {
        let size = ImageSize {
            width: self.width,
            height: self.height,
        };
        let data = self.data.iter().map(|&v| 255 - v).collect();
        Image::new(size, data).expect("sheet data matches its size")
    }
}
