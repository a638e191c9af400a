mod common;

use approx::assert_abs_diff_eq;
use common::{init_logger, line, Sheet};
use staffscan_image::Image;
use staffscan_imgproc::components::BoundingBox;
use staffscan_omr::{
    config::SkewMethod,
    duration::{ClefKind, DurationType},
    error::UnresolvedReason,
    position::{Position, StaffPosition},
    Diagnostic, OmrConfig, OmrError, ScoreReading, StaffReader,
};

const TOP: usize = 80;

fn read(page: &Image<u8, 1>) -> Result<ScoreReading, OmrError> {
    init_logger();
    StaffReader::default().read_binary(page)
}

fn descriptions(reading: &ScoreReading) -> Vec<String> {
    reading.notes.iter().map(|n| n.to_string()).collect()
}

fn one_staff() -> Sheet {
    Sheet::new(720, 240).staff(TOP).clef(40, TOP)
}

#[test]
fn quarter_between_third_and_fourth_line() -> Result<(), OmrError> {
    let midway = (line(TOP, 3) + line(TOP, 4)) / 2;
    let page = one_staff().quarter(200, midway).build();
    let reading = read(&page)?;

    assert_eq!(reading.skew.angle_deg, 0.0);
    assert!(!reading.skew.degraded);

    assert_eq!(reading.staves.len(), 1);
    let staff = &reading.staves[0];
    assert_eq!(staff.line_count, 5);
    assert_eq!(staff.y_top, TOP);
    assert_eq!(staff.height, 57);
    assert_eq!((staff.x_start, staff.x_end), (20, 700));

    assert_eq!(reading.notes.len(), 2);
    assert_eq!(
        reading.notes[0].duration,
        Some(DurationType::Clef(ClefKind::Treble))
    );
    let quarter = &reading.notes[1];
    assert_eq!(quarter.duration, Some(DurationType::Quarter));
    assert_eq!(
        quarter.position,
        Some(Position::Staff(StaffPosition::Space3To4))
    );
    assert_eq!(quarter.to_string(), "[0](3-4)|quarter|");
    assert!(reading.diagnostics.is_empty());
    Ok(())
}

#[test]
fn filled_oval_on_the_second_line_is_a_whole_note() -> Result<(), OmrError> {
    let page = one_staff().oval(300, line(TOP, 2)).build();
    let reading = read(&page)?;

    assert_eq!(reading.notes.len(), 2);
    let whole = &reading.notes[1];
    assert!(whole.stem.is_none());
    assert_eq!(whole.duration, Some(DurationType::Whole));
    assert_eq!(whole.position, Some(Position::Staff(StaffPosition::Line2)));
    assert_eq!(whole.to_string(), "[0](2)|whole|");
    Ok(())
}

#[test]
fn every_duration_on_one_staff() -> Result<(), OmrError> {
    let page = one_staff()
        .oval(160, line(TOP, 2))
        .half(260, line(TOP, 4))
        .quarter(370, (line(TOP, 3) + line(TOP, 4)) / 2)
        .eighth(480, (line(TOP, 2) + line(TOP, 3)) / 2)
        .build();
    let reading = read(&page)?;

    assert_eq!(
        descriptions(&reading),
        vec![
            "[0](-)|treble clef|",
            "[0](2)|whole|",
            "[0](4)|half|",
            "[0](3-4)|quarter|",
            "[0](2-3)|eighth|",
        ]
    );
    assert_eq!(reading.to_string().lines().count(), 5);
    assert!(reading.diagnostics.is_empty());
    Ok(())
}

#[test]
fn two_staves_are_read_top_to_bottom() -> Result<(), OmrError> {
    let second = 250;
    let page = Sheet::new(720, 400)
        .staff(TOP)
        .staff(second)
        .clef(40, TOP)
        .quarter(200, (line(TOP, 3) + line(TOP, 4)) / 2)
        .clef(40, second)
        .oval(300, line(second, 2))
        .build();
    let reading = read(&page)?;

    assert_eq!(reading.staves.len(), 2);
    assert_eq!(reading.staves[1].y_top, second);
    assert_eq!(reading.staves[1].order, 1);
    assert_eq!(
        descriptions(&reading),
        vec![
            "[0](-)|treble clef|",
            "[0](3-4)|quarter|",
            "[1](-)|treble clef|",
            "[1](2)|whole|",
        ]
    );
    assert_eq!(reading.notes_on(&reading.staves[1]).count(), 2);
    Ok(())
}

#[test]
fn skewed_page_is_leveled() -> Result<(), OmrError> {
    for angle in [3.0f32, -3.0, 1.5, -1.5] {
        let page = Sheet::new(720, 240)
            .line_thickness(2)
            .staff(TOP)
            .clef(40, TOP)
            .oval(200, line(TOP, 2))
            .quarter(320, (line(TOP, 3) + line(TOP, 4)) / 2)
            .build_rotated(angle);
        let reading = read(&page)?;

        assert!(!reading.skew.degraded);
        assert_abs_diff_eq!(reading.skew.angle_deg, -angle, epsilon = 0.5);
        assert_eq!(reading.staves.len(), 1);
        assert_eq!(
            descriptions(&reading),
            vec!["[0](-)|treble clef|", "[0](2)|whole|", "[0](3-4)|quarter|"]
        );
    }
    Ok(())
}

#[test]
fn glyph_area_window_is_inclusive() -> Result<(), OmrError> {
    // a 15x10 block between the first two lines, clear of both
    let kept = read(&one_staff().fill(300, 83, 15, 10).build())?;
    assert_eq!(kept.notes.len(), 2);
    assert_eq!(
        kept.notes[1].bbox,
        BoundingBox {
            x: 300,
            y: 83,
            width: 15,
            height: 10
        }
    );

    let dropped = read(&one_staff().fill(300, 83, 15, 10).clear(300, 83).build())?;
    assert_eq!(dropped.notes.len(), 1);
    Ok(())
}

#[test]
fn glyph_without_head_is_reported() -> Result<(), OmrError> {
    // a thin vertical stroke crossing the staff
    let page = one_staff().fill(300, 75, 3, 60).build();
    let reading = read(&page)?;

    assert_eq!(reading.notes.len(), 2);
    assert_eq!(reading.notes[1].duration, Some(DurationType::Unknown));
    assert_eq!(reading.notes[1].position, Some(Position::Unresolved));
    assert_eq!(reading.notes[1].to_string(), "[0](-)|unknown|");
    assert_eq!(
        reading.diagnostics,
        vec![Diagnostic::UnresolvedGlyph {
            index: 1,
            reason: UnresolvedReason::NoHead
        }]
    );
    Ok(())
}

#[test]
fn blank_page_has_no_stafflines() {
    let page = Sheet::new(300, 200).build();
    assert!(matches!(
        read(&page),
        Err(OmrError::NoStafflinesDetected { found: 0 })
    ));
}

#[test]
fn single_line_is_not_a_staff() {
    let page = Sheet::new(720, 240).fill(20, 100, 680, 1).build();
    assert!(matches!(
        read(&page),
        Err(OmrError::NoStafflinesDetected { found: 1 })
    ));
}

#[test]
fn staff_without_glyphs() {
    let page = Sheet::new(720, 240).staff(TOP).build();
    assert!(matches!(
        read(&page),
        Err(OmrError::NoNotesOnStaffDetected { candidates: 0 })
    ));
}

#[test]
fn glyph_beside_the_staff_is_dropped() {
    let page = Sheet::new(720, 240).staff(TOP).fill(705, 83, 15, 10).build();
    assert!(matches!(
        read(&page),
        Err(OmrError::NoNotesOnStaffDetected { candidates: 1 })
    ));
}

#[test]
fn leading_clef_rule_can_be_disabled() -> Result<(), OmrError> {
    let page = one_staff().oval(300, line(TOP, 2)).build();
    let reader = StaffReader::new(OmrConfig {
        leading_clef: false,
        ..Default::default()
    })?;
    assert!(!reader.config().leading_clef);
    let reading = reader.read_binary(&page)?;

    assert!(reading
        .notes
        .iter()
        .all(|n| !matches!(n.duration, Some(DurationType::Clef(_)))));
    assert_eq!(reading.notes[1].to_string(), "[0](2)|whole|");
    Ok(())
}

#[test]
fn grayscale_and_rgb_pages_read_like_binary() -> Result<(), OmrError> {
    init_logger();
    let sheet = || {
        one_staff()
            .oval(200, line(TOP, 2))
            .quarter(320, (line(TOP, 3) + line(TOP, 4)) / 2)
    };
    let reader = StaffReader::default();
    let expected = descriptions(&reader.read_binary(&sheet().build())?);

    let gray = sheet().build_gray();
    assert_eq!(descriptions(&reader.read_gray(&gray)?), expected);

    let rgb_data = gray.as_slice().iter().flat_map(|&v| [v, v, v]).collect();
    let rgb = Image::<u8, 3>::new(gray.size(), rgb_data)?;
    assert_eq!(descriptions(&reader.read_rgb(&rgb)?), expected);
    Ok(())
}

#[test]
fn config_from_partial_json() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let config: OmrConfig = serde_json::from_str(
        r#"{
            "group_gap_factor": 4.0,
            "skew": { "method": { "ProjectionProfile": { "limit_deg": 5.0, "step_deg": 0.5 } } }
        }"#,
    )?;
    assert_eq!(config.group_gap_factor, 4.0);
    assert_eq!(
        config.skew.method,
        SkewMethod::ProjectionProfile {
            limit_deg: 5.0,
            step_deg: 0.5
        }
    );
    assert_eq!(config.glyph_area, OmrConfig::default().glyph_area);

    let page = one_staff()
        .quarter(200, (line(TOP, 3) + line(TOP, 4)) / 2)
        .build();
    let reading = StaffReader::new(config)?.read_binary(&page)?;
    assert_eq!(reading.skew.angle_deg, 0.0);
    assert_eq!(descriptions(&reading)[1], "[0](3-4)|quarter|");
    Ok(())
}

#[test]
fn invalid_config_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let config: OmrConfig = serde_json::from_str(r#"{ "glyph_area": { "min": 10, "max": 5 } }"#)?;
    assert!(matches!(
        StaffReader::new(config),
        Err(OmrError::InvalidConfig(_))
    ));
    Ok(())
}

#[test]
fn reading_serializes_without_rasters() -> Result<(), Box<dyn std::error::Error>> {
    let page = one_staff()
        .quarter(200, (line(TOP, 3) + line(TOP, 4)) / 2)
        .build();
    let reading = read(&page)?;
    let json = serde_json::to_value(&reading)?;

    assert_eq!(json["notes"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(json["notes"][1]["duration"], "Quarter");
    assert_eq!(json["notes"][1]["staff"], 0);
    assert_eq!(json["notes"][0]["duration"]["Clef"], "Treble");
    assert!(json["notes"][1].get("crop").is_none());
    assert_eq!(json["staves"][0]["line_count"], 5);
    Ok(())
}
