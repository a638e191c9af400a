//! Staff line segments and their grouping into staves.

use std::fmt;

use serde::Serialize;
use staffscan_imgproc::components::BoundingBox;

use crate::error::OmrError;

/// A horizontal run of ink extracted from the horizontal line mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StaffLineSegment {
    /// Left-most column.
    pub x_start: usize,
    /// One past the right-most column.
    pub x_end: usize,
    /// Top row of the segment.
    pub y: usize,
    /// Height of the segment in pixels.
    pub thickness: usize,
}

impl From<BoundingBox> for StaffLineSegment {
    fn from(bbox: BoundingBox) -> Self {
        Self {
            x_start: bbox.x,
            x_end: bbox.right(),
            y: bbox.y,
            thickness: bbox.height,
        }
    }
}

/// Index of a [`Staff`] in the top-to-bottom list of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StaffId(pub usize);

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A group of staff lines read together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Staff {
    /// Left-most column of the member segments.
    pub x_start: usize,
    /// One past the right-most column of the member segments.
    pub x_end: usize,
    /// Top row of the first line.
    pub y_top: usize,
    /// Distance from the top of the first line to the bottom of the last one.
    pub height: usize,
    /// Position of the staff in the top-to-bottom order, starting at 0.
    pub order: usize,
    /// A quarter of the staff height.
    pub line_spacing: f32,
    /// Number of segments grouped in the staff.
    pub line_count: usize,
}

impl Staff {
    /// Handle of the staff.
    pub fn id(&self) -> StaffId {
        StaffId(self.order)
    }

    /// One past the bottom row of the last line.
    pub fn y_bottom(&self) -> usize {
        self.y_top + self.height
    }

    /// Whether the point lies in the columns `x_start..x_end` of the staff and
    /// within `margin` pixels above or below it. The vertical bounds are
    /// inclusive.
    pub fn contains(&self, x: usize, y: usize, margin: f32) -> bool {
        if !(self.x_start..self.x_end).contains(&x) {
            return false;
        }
        let y = y as f32;
        y >= self.y_top as f32 - margin && y <= self.y_bottom() as f32 + margin
    }

    fn from_segments(segments: &[StaffLineSegment], order: usize) -> Self {
        let first = segments[0];
        let last = segments[segments.len() - 1];
        let x_start = segments.iter().map(|s| s.x_start).min().unwrap_or(first.x_start);
        let x_end = segments.iter().map(|s| s.x_end).max().unwrap_or(first.x_end);
        let height = (last.y + last.thickness).saturating_sub(first.y);
        Self {
            x_start,
            x_end,
            y_top: first.y,
            height,
            order,
            line_spacing: height as f32 / 4.0,
            line_count: segments.len(),
        }
    }
}

/// Cluster staff line segments into staves by their vertical spacing.
///
/// The segments are sorted by row, and a new staff starts whenever the gap to
/// the previous segment exceeds `gap_factor` times the average gap between
/// consecutive segments of the page.
///
/// # Arguments
///
/// * `segments` - The staff line segments of the page, in any order.
/// * `gap_factor` - Multiple of the average gap that separates two staves.
///
/// # Errors
///
/// Returns [`OmrError::NoStafflinesDetected`] with fewer than two segments.
///
/// # Examples
///
/// ```
/// use staffscan_omr::staff::{group_staves, StaffLineSegment};
///
/// let segments: Vec<_> = [10, 20, 30, 40, 50, 150, 160, 170, 180, 190]
///     .iter()
///     .map(|&y| StaffLineSegment { x_start: 0, x_end: 100, y, thickness: 1 })
///     .collect();
///
/// let staves = group_staves(&segments, 3.0).unwrap();
/// assert_eq!(staves.len(), 2);
/// assert_eq!(staves[1].y_top, 150);
/// ```
pub fn group_staves(
    segments: &[StaffLineSegment],
    gap_factor: f32,
) -> Result<Vec<Staff>, OmrError> {
    if segments.len() < 2 {
        return Err(OmrError::NoStafflinesDetected {
            found: segments.len(),
        });
    }

    let mut sorted = segments.to_vec();
    sorted.sort_by_key(|s| (s.y, s.x_start));

    let total_gap: usize = sorted.windows(2).map(|w| w[1].y - w[0].y).sum();
    let average_gap = total_gap as f32 / (sorted.len() - 1) as f32;
    let max_gap = gap_factor * average_gap;

    let mut staves = Vec::new();
    let mut start = 0;
    for i in 1..=sorted.len() {
        let closes = i == sorted.len() || (sorted[i].y - sorted[i - 1].y) as f32 > max_gap;
        if closes {
            staves.push(Staff::from_segments(&sorted[start..i], staves.len()));
            start = i;
        }
    }

    for staff in staves.iter().filter(|s| s.line_count != 5) {
        log::warn!(
            "staff {} groups {} lines instead of 5",
            staff.order,
            staff.line_count
        );
    }

    log::debug!(
        "grouped {} segments into {} staves, average gap {:.2}",
        sorted.len(),
        staves.len(),
        average_gap
    );

    Ok(staves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn segment(y: usize) -> StaffLineSegment {
        StaffLineSegment {
            x_start: 20,
            x_end: 700,
            y,
            thickness: 2,
        }
    }

    fn page(tops: &[usize], spacing: usize) -> Vec<StaffLineSegment> {
        tops.iter()
            .flat_map(|&top| (0..5).map(move |k| segment(top + k * spacing)))
            .collect()
    }

    #[test]
    fn rejects_fewer_than_two_segments() {
        assert!(matches!(
            group_staves(&[], 3.0),
            Err(OmrError::NoStafflinesDetected { found: 0 })
        ));
        assert!(matches!(
            group_staves(&[segment(10)], 3.0),
            Err(OmrError::NoStafflinesDetected { found: 1 })
        ));
    }

    #[test]
    fn separated_staves_are_recovered() -> Result<(), OmrError> {
        for k in 1..=4 {
            let tops: Vec<usize> = (0..k).map(|i| 40 + i * 150).collect();
            let staves = group_staves(&page(&tops, 12), 3.0)?;
            assert_eq!(staves.len(), k);
            for (i, staff) in staves.iter().enumerate() {
                assert_eq!(staff.order, i);
                assert_eq!(staff.y_top, tops[i]);
                assert_eq!(staff.line_count, 5);
                assert_relative_eq!(staff.line_spacing, 12.0, epsilon = 0.6);
            }
        }
        Ok(())
    }

    #[test]
    fn staff_geometry() -> Result<(), OmrError> {
        let mut segments = page(&[100], 10);
        segments[2].x_start = 5;
        segments[4].x_end = 710;
        segments.reverse();

        let staves = group_staves(&segments, 3.0)?;
        assert_eq!(staves.len(), 1);
        let staff = &staves[0];
        assert_eq!(staff.x_start, 5);
        assert_eq!(staff.x_end, 710);
        assert_eq!(staff.y_top, 100);
        assert_eq!(staff.height, 42);
        assert_relative_eq!(staff.line_spacing, 10.5);
        assert_eq!(staff.y_bottom(), 142);
        Ok(())
    }

    #[test]
    fn two_segments_form_one_staff() -> Result<(), OmrError> {
        let staves = group_staves(&[segment(10), segment(30)], 3.0)?;
        assert_eq!(staves.len(), 1);
        assert_eq!(staves[0].line_count, 2);
        Ok(())
    }

    #[test]
    fn containment_includes_the_margin() {
        let staff = Staff::from_segments(&page(&[100], 10), 0);
        assert!(staff.contains(20, 100, 0.0));
        assert!(staff.contains(699, 142, 0.0));
        assert!(!staff.contains(700, 120, 10.0));
        assert!(!staff.contains(19, 120, 10.0));
        assert!(staff.contains(300, 90, 10.0));
        assert!(!staff.contains(300, 89, 10.0));
        assert!(staff.contains(300, 152, 10.0));
    }
}
