use serde::{Deserialize, Serialize};
use staffscan_image::{Image, ImageError};

use crate::union_find::UnionFind;

/// Axis aligned bounding box in raster coordinates.
///
/// # Examples
///
/// ```
/// use staffscan_imgproc::components::BoundingBox;
///
/// let bbox = BoundingBox { x: 10, y: 4, width: 5, height: 6 };
/// assert_eq!(bbox.x_center(), 12);
/// assert_eq!(bbox.y_center(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left-most column.
    pub x: usize,
    /// Top-most row.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl BoundingBox {
    /// Horizontal center, `x + width / 2` rounded down.
    pub fn x_center(&self) -> usize {
        self.x + self.width / 2
    }

    /// Vertical center, `y + height / 2` rounded down.
    pub fn y_center(&self) -> usize {
        self.y + self.height / 2
    }

    /// One past the right-most column.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the bottom-most row.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }
}

/// Pixel connectivity used by the labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Horizontal and vertical neighbors only.
    Four,
    /// Horizontal, vertical and diagonal neighbors.
    #[default]
    Eight,
}

/// Bounding box and pixel area of one labeled component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentStats {
    /// Bounding box of the component.
    pub bbox: BoundingBox,
    /// Number of pixels of the component.
    pub area: usize,
}

/// Result of [`connected_components`].
///
/// Label `0` is the background; component `i` carries label `i + 1` and its
/// statistics live in `stats[i]`.
#[derive(Debug, Clone)]
pub struct Labels {
    /// Per-pixel labels.
    pub labels: Image<u32, 1>,
    /// Statistics of every component, in label order.
    pub stats: Vec<ComponentStats>,
}

/// Label the connected foreground (non-zero) regions of a mask.
///
/// Runs the classic two-pass algorithm: the first pass hands out provisional
/// labels and records equivalences in a [`UnionFind`], the second pass resolves
/// every provisional label to its set and numbers the sets in raster order of
/// their first pixel.
///
/// # Arguments
///
/// * `src` - The input mask.
/// * `connectivity` - The pixel neighborhood.
///
/// # Examples
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_imgproc::components::{connected_components, Connectivity};
///
/// let mask = Image::<u8, 1>::new(
///     ImageSize { width: 4, height: 2 },
///     vec![255, 0, 0, 255, 255, 0, 0, 255],
/// ).unwrap();
///
/// let labels = connected_components(&mask, Connectivity::Eight).unwrap();
/// assert_eq!(labels.stats.len(), 2);
/// assert_eq!(labels.stats[0].area, 2);
/// ```
pub fn connected_components(
    src: &Image<u8, 1>,
    connectivity: Connectivity,
) -> Result<Labels, ImageError> {
    let width = src.width();
    let height = src.height();
    let data = src.as_slice();

    let mut provisional = vec![usize::MAX; width * height];
    let mut uf = UnionFind::new();

    // first pass: provisional labels and equivalences
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            if data[i] == 0 {
                continue;
            }

            let mut neighbors = [usize::MAX; 4];
            if x > 0 {
                neighbors[0] = provisional[i - 1];
            }
            if y > 0 {
                neighbors[1] = provisional[i - width];
                if connectivity == Connectivity::Eight {
                    if x > 0 {
                        neighbors[2] = provisional[i - width - 1];
                    }
                    if x + 1 < width {
                        neighbors[3] = provisional[i - width + 1];
                    }
                }
            }

            let mut label = usize::MAX;
            for &n in neighbors.iter().filter(|&&n| n != usize::MAX) {
                if label == usize::MAX {
                    label = n;
                } else {
                    uf.union(label, n);
                }
            }

            if label == usize::MAX {
                label = uf.push();
            }
            provisional[i] = label;
        }
    }

    // second pass: resolve and number in raster order
    let mut final_of_root = vec![0u32; uf.len()];
    let mut stats: Vec<ComponentStats> = Vec::new();
    let mut extents: Vec<(usize, usize, usize, usize)> = Vec::new();
    let mut labels = vec![0u32; width * height];

    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            if provisional[i] == usize::MAX {
                continue;
            }
            let root = uf.find(provisional[i]);
            if final_of_root[root] == 0 {
                stats.push(ComponentStats {
                    bbox: BoundingBox::default(),
                    area: 0,
                });
                extents.push((x, y, x, y));
                final_of_root[root] = stats.len() as u32;
            }
            let label = final_of_root[root];
            labels[i] = label;

            let idx = (label - 1) as usize;
            stats[idx].area += 1;
            let ext = &mut extents[idx];
            ext.0 = ext.0.min(x);
            ext.1 = ext.1.min(y);
            ext.2 = ext.2.max(x);
            ext.3 = ext.3.max(y);
        }
    }

    for (stat, (x0, y0, x1, y1)) in stats.iter_mut().zip(extents) {
        stat.bbox = BoundingBox {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        };
    }

    Ok(Labels {
        labels: Image::new(src.size(), labels)?,
        stats,
    })
}

/// Keep only the components whose area lies in `[min_area, max_area]`.
///
/// # Arguments
///
/// * `labels` - The labeling of the mask.
/// * `min_area` - Smallest area kept (inclusive).
/// * `max_area` - Largest area kept (inclusive).
/// * `dst` - The output mask, 255 for kept pixels and 0 elsewhere.
pub fn filter_components_by_area(
    labels: &Labels,
    min_area: usize,
    max_area: usize,
    dst: &mut Image<u8, 1>,
) -> Result<(), ImageError> {
    if labels.labels.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            labels.labels.cols(),
            labels.labels.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let keep: Vec<bool> = labels
        .stats
        .iter()
        .map(|s| s.area >= min_area && s.area <= max_area)
        .collect();

    dst.as_slice_mut()
        .iter_mut()
        .zip(labels.labels.as_slice())
        .for_each(|(out, &label)| {
            *out = if label != 0 && keep[(label - 1) as usize] {
                255
            } else {
                0
            };
        });

    Ok(())
}
