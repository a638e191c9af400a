//! Duration classification from the detected note parts.

use std::fmt;

use serde::Serialize;

use crate::glyph::{Head, Openness, Stem, StemKind};

/// Kind of a clef.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClefKind {
    /// G clef, drawn taller than the staff.
    Treble,
    /// F clef.
    Bass,
}

/// Type assigned to a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DurationType {
    /// Head without stem.
    Whole,
    /// Open head with a plain stem.
    Half,
    /// Closed head with a plain stem.
    Quarter,
    /// Head with a flagged stem.
    Eighth,
    /// Clef leading a staff.
    Clef(ClefKind),
    /// No head was found.
    Unknown,
    /// The parts match no rule of the table.
    Unresolved,
}

impl fmt::Display for DurationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DurationType::Whole => "whole",
            DurationType::Half => "half",
            DurationType::Quarter => "quarter",
            DurationType::Eighth => "eighth",
            DurationType::Clef(ClefKind::Treble) => "treble clef",
            DurationType::Clef(ClefKind::Bass) => "bass clef",
            DurationType::Unknown => "unknown",
            DurationType::Unresolved => "unresolved",
        };
        f.write_str(text)
    }
}

/// The part features the duration depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartSignature {
    /// A head was detected.
    pub head_present: bool,
    /// A stem was detected.
    pub stem_present: bool,
    /// Kind of the stem, when known.
    pub stem_kind: Option<StemKind>,
    /// Fill of the head, when known.
    pub head_openness: Option<Openness>,
}

impl PartSignature {
    /// Signature of a pair of detected parts.
    pub fn of(head: Option<&Head>, stem: Option<&Stem>) -> Self {
        Self {
            head_present: head.is_some(),
            stem_present: stem.is_some(),
            stem_kind: stem.map(|s| s.kind),
            head_openness: head.map(|h| h.openness),
        }
    }
}

/// Classify a glyph from its part signature.
///
/// | head | stem    | head fill | type       |
/// |------|---------|-----------|------------|
/// | no   | any     | any       | unknown    |
/// | yes  | no      | any       | whole      |
/// | yes  | flagged | any       | eighth     |
/// | yes  | plain   | open      | half       |
/// | yes  | plain   | closed    | quarter    |
///
/// Any other combination is [`DurationType::Unresolved`].
///
/// # Examples
///
/// ```
/// use staffscan_omr::duration::{classify_duration, DurationType, PartSignature};
/// use staffscan_omr::glyph::{Openness, StemKind};
///
/// let signature = PartSignature {
///     head_present: true,
///     stem_present: true,
///     stem_kind: Some(StemKind::Plain),
///     head_openness: Some(Openness::Open),
/// };
/// assert_eq!(classify_duration(signature), DurationType::Half);
/// ```
pub fn classify_duration(signature: PartSignature) -> DurationType {
    match (
        signature.head_present,
        signature.stem_present,
        signature.stem_kind,
        signature.head_openness,
    ) {
        (false, _, _, _) => DurationType::Unknown,
        (true, false, _, _) => DurationType::Whole,
        (true, true, Some(StemKind::Flagged), _) => DurationType::Eighth,
        (true, true, Some(StemKind::Plain), Some(Openness::Open)) => DurationType::Half,
        (true, true, Some(StemKind::Plain), Some(Openness::Closed)) => DurationType::Quarter,
        _ => DurationType::Unresolved,
    }
}

/// Kind of the clef leading a staff: glyphs taller than the staff are treble clefs.
pub fn classify_clef(glyph_height: usize, staff_height: usize) -> ClefKind {
    if glyph_height > staff_height {
        ClefKind::Treble
    } else {
        ClefKind::Bass
    }
}
