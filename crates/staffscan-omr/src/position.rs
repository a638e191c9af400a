//! Vertical position of note heads relative to the staff lines.

use std::fmt;

use serde::Serialize;

/// One of the nine line or space positions of a five line staff, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StaffPosition {
    /// On the first (top) line.
    Line1,
    /// Between lines 1 and 2.
    Space1To2,
    /// On line 2.
    Line2,
    /// Between lines 2 and 3.
    Space2To3,
    /// On line 3.
    Line3,
    /// Between lines 3 and 4.
    Space3To4,
    /// On line 4.
    Line4,
    /// Between lines 4 and 5.
    Space4To5,
    /// On the fifth (bottom) line.
    Line5,
}

impl StaffPosition {
    /// All the positions, top to bottom.
    pub const ALL: [StaffPosition; 9] = [
        StaffPosition::Line1,
        StaffPosition::Space1To2,
        StaffPosition::Line2,
        StaffPosition::Space2To3,
        StaffPosition::Line3,
        StaffPosition::Space3To4,
        StaffPosition::Line4,
        StaffPosition::Space4To5,
        StaffPosition::Line5,
    ];

    /// Short label, `"1"` for a line and `"1-2"` for a space.
    pub fn label(&self) -> &'static str {
        match self {
            StaffPosition::Line1 => "1",
            StaffPosition::Space1To2 => "1-2",
            StaffPosition::Line2 => "2",
            StaffPosition::Space2To3 => "2-3",
            StaffPosition::Line3 => "3",
            StaffPosition::Space3To4 => "3-4",
            StaffPosition::Line4 => "4",
            StaffPosition::Space4To5 => "4-5",
            StaffPosition::Line5 => "5",
        }
    }
}

impl fmt::Display for StaffPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position recorded for a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Position {
    /// The head sits on a line or in a space of the staff.
    Staff(StaffPosition),
    /// The glyph has no pitch position, as for clefs.
    NotApplicable,
    /// The head lies outside every band, or there is no head.
    Unresolved,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Staff(p) => p.fmt(f),
            Position::NotApplicable | Position::Unresolved => f.write_str("-"),
        }
    }
}

/// Map the row of a head center to a staff position.
///
/// The staff is split into nine bands half a line spacing tall, the first one
/// starting a quarter spacing above the top line. Each band is closed above
/// and open below. Rows outside every band map to [`Position::Unresolved`].
///
/// # Arguments
///
/// * `y` - Row of the head center, in page coordinates.
/// * `y_top` - Top row of the staff.
/// * `line_spacing` - Line spacing of the staff.
///
/// # Examples
///
/// ```
/// use staffscan_omr::position::{map_position, Position, StaffPosition};
///
/// assert_eq!(map_position(120.0, 100.0, 10.0), Position::Staff(StaffPosition::Line3));
/// assert_eq!(map_position(80.0, 100.0, 10.0), Position::Unresolved);
/// ```
pub fn map_position(y: f32, y_top: f32, line_spacing: f32) -> Position {
    let band = line_spacing / 2.0;
    if band.is_nan() || band <= 0.0 || !y.is_finite() {
        return Position::Unresolved;
    }

    let first_lower = y_top - line_spacing / 4.0;
    let index = ((y - first_lower) / band).floor();
    if index < 0.0 || index >= StaffPosition::ALL.len() as f32 {
        return Position::Unresolved;
    }

    Position::Staff(StaffPosition::ALL[index as usize])
}
