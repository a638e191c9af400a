//! The recognition pipeline, from a page raster to the annotated glyphs.

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;
use staffscan_image::Image;
use staffscan_imgproc::{color::gray_from_rgb, threshold::adaptive_threshold_mean_inverse};

use crate::{
    assign::assign_glyphs,
    config::OmrConfig,
    duration::{classify_clef, classify_duration, DurationType, PartSignature},
    error::{Diagnostic, OmrError, UnresolvedReason},
    extract::{extract_glyphs, extract_staff_line_segments},
    glyph::NoteGlyph,
    lines::extract_line_structure,
    parts::segment_parts,
    position::{map_position, Position},
    rotation::{normalize_rotation, SkewEstimate},
    staff::{group_staves, Staff},
};

/// Result of reading one page.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReading {
    /// Staves of the page, top to bottom.
    pub staves: Vec<Staff>,
    /// Glyphs kept on a staff, in reading order.
    pub notes: Vec<NoteGlyph>,
    /// Skew removed before the segmentation.
    pub skew: SkewEstimate,
    /// Non-fatal conditions met while reading.
    pub diagnostics: Vec<Diagnostic>,
}

impl ScoreReading {
    /// The glyphs of one staff, left to right.
    pub fn notes_on(&self, staff: &Staff) -> impl Iterator<Item = &NoteGlyph> {
        let id = staff.id();
        self.notes.iter().filter(move |n| n.staff == Some(id))
    }
}

impl fmt::Display for ScoreReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for note in &self.notes {
            writeln!(f, "{note}")?;
        }
        Ok(())
    }
}

/// Reads staves and notes from page rasters.
///
/// # Examples
///
/// ```
/// use staffscan_image::{Image, ImageSize};
/// use staffscan_omr::{OmrError, StaffReader};
///
/// let reader = StaffReader::default();
/// let blank = Image::<u8, 1>::from_size_val(ImageSize { width: 300, height: 200 }, 0).unwrap();
///
/// let result = reader.read_binary(&blank);
/// assert!(matches!(result, Err(OmrError::NoStafflinesDetected { found: 0 })));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaffReader {
    config: OmrConfig,
}

impl StaffReader {
    /// Create a reader after validating its configuration.
    pub fn new(config: OmrConfig) -> Result<Self, OmrError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration of the reader.
    pub fn config(&self) -> &OmrConfig {
        &self.config
    }

    /// Read an RGB page.
    pub fn read_rgb(&self, page: &Image<u8, 3>) -> Result<ScoreReading, OmrError> {
        let mut gray = Image::from_size_val(page.size(), 0u8)?;
        gray_from_rgb(page, &mut gray)?;
        self.read_gray(&gray)
    }

    /// Read a grayscale page with dark ink on a bright background.
    pub fn read_gray(&self, page: &Image<u8, 1>) -> Result<ScoreReading, OmrError> {
        let mut binary = Image::from_size_val(page.size(), 0u8)?;
        adaptive_threshold_mean_inverse(
            page,
            &mut binary,
            self.config.binarize.block_size,
            self.config.binarize.offset,
            255,
        )?;
        self.read_binary(&binary)
    }

    /// Read a binary page, ink non-zero on a zero background.
    ///
    /// # Errors
    ///
    /// Fails with [`OmrError::NoStafflinesDetected`] when fewer than two staff
    /// line segments are found, and with [`OmrError::NoNotesOnStaffDetected`]
    /// when no glyph lies on a staff.
    pub fn read_binary(&self, page: &Image<u8, 1>) -> Result<ScoreReading, OmrError> {
        let config = &self.config;
        let mut diagnostics = Vec::new();

        let (leveled, skew) = normalize_rotation(page, &config.skew)?;
        if skew.degraded {
            diagnostics.push(Diagnostic::DegradedSkewEstimate);
        }

        let structure = extract_line_structure(&leveled, &config.lines)?;

        let segments = extract_staff_line_segments(&structure.horizontal, config.staff_line_area)?;
        let staves = group_staves(&segments, config.group_gap_factor)?;

        let candidates = extract_glyphs(&structure.glyphs, config.glyph_area)?;
        let mut notes = assign_glyphs(candidates, &staves, config.margin_factor)?;
        notes.sort_by_key(|n| (n.staff, n.bbox.x, n.bbox.y));

        annotate_glyphs(&mut notes, &staves, config);

        for (index, note) in notes.iter().enumerate() {
            if let Some(reason) = unresolved_reason(note) {
                log::warn!("glyph {index} at x = {} unresolved: {reason}", note.bbox.x);
                diagnostics.push(Diagnostic::UnresolvedGlyph { index, reason });
            }
        }

        log::info!(
            "read {} glyphs on {} staves, skew {:.2} deg",
            notes.len(),
            staves.len(),
            skew.angle_deg
        );

        Ok(ScoreReading {
            staves,
            notes,
            skew,
            diagnostics,
        })
    }
}

/// Indices of the left-most glyph of every staff.
fn leading_glyphs(notes: &[NoteGlyph], staves: &[Staff]) -> Vec<usize> {
    staves
        .iter()
        .filter_map(|staff| {
            notes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.staff == Some(staff.id()))
                .min_by_key(|(_, n)| n.bbox.x)
                .map(|(i, _)| i)
        })
        .collect()
}

/// Segment, classify and place every glyph assigned to a staff.
///
/// Glyphs are processed in parallel; each one only reads the staves and
/// writes its own record.
pub fn annotate_glyphs(notes: &mut [NoteGlyph], staves: &[Staff], config: &OmrConfig) {
    let clefs = if config.leading_clef {
        leading_glyphs(notes, staves)
    } else {
        Vec::new()
    };

    notes.par_iter_mut().enumerate().for_each(|(i, note)| {
        let (head, stem) = segment_parts(&note.crop, &config.stem, &config.head);
        note.head = head;
        note.stem = stem;

        let staff = note.staff.and_then(|id| staves.get(id.0));

        if clefs.contains(&i) {
            if let Some(staff) = staff {
                note.duration = Some(DurationType::Clef(classify_clef(
                    note.bbox.height,
                    staff.height,
                )));
                note.position = Some(Position::NotApplicable);
            }
            return;
        }

        note.duration = Some(classify_duration(PartSignature::of(
            note.head.as_ref(),
            note.stem.as_ref(),
        )));
        note.position = staff.map(|staff| match note.head_center_y() {
            Some(y) => map_position(y, staff.y_top as f32, staff.line_spacing),
            None => Position::Unresolved,
        });
    });
}

fn unresolved_reason(note: &NoteGlyph) -> Option<UnresolvedReason> {
    match (note.duration, note.position) {
        (Some(DurationType::Clef(_)), _) => None,
        (Some(DurationType::Unknown), _) => Some(UnresolvedReason::NoHead),
        (Some(DurationType::Unresolved), _) => Some(UnresolvedReason::AmbiguousParts),
        (_, Some(Position::Unresolved)) => Some(UnresolvedReason::OutsideStaffBands),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staff::{StaffId, StaffLineSegment};
    use staffscan_image::ImageSize;
    use staffscan_imgproc::components::BoundingBox;

    fn staff() -> Result<Vec<Staff>, OmrError> {
        let segments: Vec<StaffLineSegment> = (0..5)
            .map(|k| StaffLineSegment {
                x_start: 0,
                x_end: 400,
                y: 100 + k * 10,
                thickness: 1,
            })
            .collect();
        group_staves(&segments, 3.0)
    }

    fn block(x: usize, y: usize, width: usize, height: usize) -> Result<NoteGlyph, OmrError> {
        let crop = Image::from_size_val(ImageSize { width, height }, 255)?;
        let mut note = NoteGlyph::new(
            BoundingBox {
                x,
                y,
                width,
                height,
            },
            crop,
        );
        note.staff = Some(StaffId(0));
        Ok(note)
    }

    #[test]
    fn leading_glyph_becomes_a_clef() -> Result<(), OmrError> {
        let staves = staff()?;
        // a tall block, then a whole note sitting on line 3
        let mut notes = vec![block(80, 90, 12, 60)?, block(30, 80, 10, 80)?, block(150, 114, 18, 13)?];
        annotate_glyphs(&mut notes, &staves, &OmrConfig::default());

        assert_eq!(notes[1].duration, Some(DurationType::Clef(crate::duration::ClefKind::Treble)));
        assert_eq!(notes[1].position, Some(Position::NotApplicable));
        assert_eq!(notes[1].to_string(), "[0](-)|treble clef|");
        assert_eq!(notes[0].duration, Some(DurationType::Whole));
        assert_eq!(notes[2].duration, Some(DurationType::Whole));
        assert_eq!(notes[2].to_string(), "[0](3)|whole|");
        Ok(())
    }

    #[test]
    fn clef_rule_can_be_disabled() -> Result<(), OmrError> {
        let staves = staff()?;
        let mut notes = vec![block(30, 80, 10, 80)?];
        let config = OmrConfig {
            leading_clef: false,
            ..Default::default()
        };
        annotate_glyphs(&mut notes, &staves, &config);
        assert!(!matches!(notes[0].duration, Some(DurationType::Clef(_))));
        Ok(())
    }

    #[test]
    fn unresolved_reasons() -> Result<(), OmrError> {
        let mut note = block(0, 0, 4, 4)?;
        note.duration = Some(DurationType::Unknown);
        assert_eq!(unresolved_reason(&note), Some(UnresolvedReason::NoHead));

        note.duration = Some(DurationType::Quarter);
        note.position = Some(Position::Unresolved);
        assert_eq!(
            unresolved_reason(&note),
            Some(UnresolvedReason::OutsideStaffBands)
        );

        note.duration = Some(DurationType::Clef(crate::duration::ClefKind::Bass));
        note.position = Some(Position::NotApplicable);
        assert_eq!(unresolved_reason(&note), None);
        Ok(())
    }
}
