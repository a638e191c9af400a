//! Glyph records and their detected parts.

use std::fmt;

use serde::Serialize;
use staffscan_image::Image;
use staffscan_imgproc::components::BoundingBox;

use crate::{duration::DurationType, position::Position, staff::StaffId};

/// Fill of a note head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Openness {
    /// Hollow head, as in half and whole notes.
    Open,
    /// Filled head.
    Closed,
}

/// Shape of a stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StemKind {
    /// A bare stem.
    Plain,
    /// A stem carrying a flag.
    Flagged,
}

/// A note head, in coordinates relative to the glyph crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Head {
    /// Box of the head inside the crop.
    pub bbox: BoundingBox,
    /// Whether the head is hollow.
    pub openness: Openness,
}

/// A stem, in coordinates relative to the glyph crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stem {
    /// Box of the stem inside the crop, flag included.
    pub bbox: BoundingBox,
    /// Whether a flag is attached.
    pub kind: StemKind,
}

/// A candidate symbol cut out of the glyph raster.
///
/// The record starts with only the box and the crop, and is filled in by the
/// later stages: staff assignment, part segmentation, duration and position.
#[derive(Debug, Clone, Serialize)]
pub struct NoteGlyph {
    /// Box of the glyph in page coordinates.
    pub bbox: BoundingBox,
    /// Binary crop of the glyph raster.
    #[serde(skip)]
    pub crop: Image<u8, 1>,
    /// The staff the glyph belongs to.
    pub staff: Option<StaffId>,
    /// Detected note head.
    pub head: Option<Head>,
    /// Detected stem.
    pub stem: Option<Stem>,
    /// Duration or symbol type.
    pub duration: Option<DurationType>,
    /// Position of the head on the staff.
    pub position: Option<Position>,
}

impl NoteGlyph {
    /// Create a glyph record with nothing detected yet.
    pub fn new(bbox: BoundingBox, crop: Image<u8, 1>) -> Self {
        Self {
            bbox,
            crop,
            staff: None,
            head: None,
            stem: None,
            duration: None,
            position: None,
        }
    }

    /// Row of the head center in page coordinates.
    pub fn head_center_y(&self) -> Option<f32> {
        self.head.map(|head| {
            self.bbox.y as f32 + head.bbox.y as f32 + head.bbox.height as f32 / 2.0
        })
    }
}

/// Compact form `[staff](position)|type|`, with `-` for missing fields.
impl fmt::Display for NoteGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.staff {
            Some(staff) => write!(f, "[{staff}]")?,
            None => f.write_str("[-]")?,
        }
        match self.position {
            Some(position) => write!(f, "({position})")?,
            None => f.write_str("(-)")?,
        }
        match self.duration {
            Some(duration) => write!(f, "|{duration}|"),
            None => f.write_str("|-|"),
        }
    }
}
