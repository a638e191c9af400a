use crate::{error::OmrError, glyph::NoteGlyph, staff::Staff};

/// Attach every glyph to the first staff containing its box center.
///
/// A staff contains a center lying in its horizontal span and no further than
/// `margin_factor` line spacings above or below it. Glyphs matching no staff
/// are dropped; the others keep their order.
///
/// # Errors
///
/// Returns [`OmrError::NoNotesOnStaffDetected`] when no glyph is kept.
pub fn assign_glyphs(
    glyphs: Vec<NoteGlyph>,
    staves: &[Staff],
    margin_factor: f32,
) -> Result<Vec<NoteGlyph>, OmrError> {
    let candidates = glyphs.len();

    let assigned: Vec<NoteGlyph> = glyphs
        .into_iter()
        .filter_map(|mut glyph| {
            let (x, y) = (glyph.bbox.x_center(), glyph.bbox.y_center());
            let staff = staves
                .iter()
                .find(|s| s.contains(x, y, margin_factor * s.line_spacing))?;
            glyph.staff = Some(staff.id());
            Some(glyph)
        })
        .collect();

    if assigned.is_empty() {
        return Err(OmrError::NoNotesOnStaffDetected { candidates });
    }

    log::debug!(
        "assigned {} of {} glyph candidates to a staff",
        assigned.len(),
        candidates
    );

    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staff::{group_staves, StaffId, StaffLineSegment};
    use staffscan_image::{Image, ImageSize};
    use staffscan_imgproc::components::BoundingBox;

    fn staves() -> Result<Vec<Staff>, OmrError> {
        // two staves 100 pixels apart, line spacing 10
        let segments: Vec<StaffLineSegment> = [50, 150]
            .iter()
            .flat_map(|&top| {
                (0..5).map(move |k| StaffLineSegment {
                    x_start: 20,
                    x_end: 500,
                    y: top + k * 10,
                    thickness: 1,
                })
            })
            .collect();
        group_staves(&segments, 3.0)
    }

    fn glyph(x_center: usize, y_center: usize) -> Result<NoteGlyph, OmrError> {
        let bbox = BoundingBox {
            x: x_center - 5,
            y: y_center - 5,
            width: 10,
            height: 10,
        };
        let crop = Image::from_size_val(ImageSize::from([10, 10]), 255)?;
        Ok(NoteGlyph::new(bbox, crop))
    }

    #[test]
    fn glyphs_go_to_the_containing_staff() -> Result<(), OmrError> {
        let staves = staves()?;
        let glyphs = vec![glyph(100, 70)?, glyph(120, 170)?, glyph(140, 41)?];
        let assigned = assign_glyphs(glyphs, &staves, 1.0)?;

        let ids: Vec<Option<StaffId>> = assigned.iter().map(|g| g.staff).collect();
        assert_eq!(ids, vec![Some(StaffId(0)), Some(StaffId(1)), Some(StaffId(0))]);
        Ok(())
    }

    #[test]
    fn glyphs_off_every_staff_are_dropped() -> Result<(), OmrError> {
        let staves = staves()?;
        // between the staves, left of them and far below
        let glyphs = vec![glyph(100, 70)?, glyph(100, 115)?, glyph(10, 70)?, glyph(100, 300)?];
        let assigned = assign_glyphs(glyphs, &staves, 1.0)?;
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].bbox.x_center(), 100);
        assert_eq!(assigned[0].bbox.y_center(), 70);
        Ok(())
    }

    #[test]
    fn right_edge_of_the_staff_is_exclusive() -> Result<(), OmrError> {
        // the segments cover columns 20 to 499
        let staves = staves()?;
        let assigned = assign_glyphs(vec![glyph(499, 70)?, glyph(500, 70)?], &staves, 1.0)?;
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].bbox.x_center(), 499);
        Ok(())
    }

    #[test]
    fn no_glyph_on_a_staff_is_an_error() -> Result<(), OmrError> {
        let staves = staves()?;
        let result = assign_glyphs(vec![glyph(600, 70)?], &staves, 1.0);
        assert!(matches!(
            result,
            Err(OmrError::NoNotesOnStaffDetected { candidates: 1 })
        ));
        Ok(())
    }

    #[test]
    fn each_glyph_gets_exactly_one_staff() -> Result<(), OmrError> {
        // with a huge margin the staves overlap and the first one wins
        let staves = staves()?;
        let glyphs: Vec<NoteGlyph> = (0..30)
            .map(|i| glyph(200, 40 + i * 5))
            .collect::<Result<_, _>>()?;
        let assigned = assign_glyphs(glyphs, &staves, 20.0)?;
        assert_eq!(assigned.len(), 30);
        assert!(assigned.iter().all(|g| g.staff == Some(StaffId(0))));
        Ok(())
    }
}
