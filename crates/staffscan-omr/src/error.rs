use std::fmt;

use serde::Serialize;

/// Errors that stop the recognition of a page.
#[derive(Debug, thiserror::Error)]
pub enum OmrError {
    /// Error related to image.
    #[error(transparent)]
    ImageError(#[from] staffscan_image::ImageError),

    /// Fewer than two staff line segments survived the extraction.
    #[error("No stafflines detected: found {found} staff line segments, at least 2 are needed")]
    NoStafflinesDetected {
        /// Number of staff line segments found.
        found: usize,
    },

    /// None of the glyph candidates lies on a staff.
    #[error("No notes on staff detected: none of the {candidates} glyph candidates lies on a staff")]
    NoNotesOnStaffDetected {
        /// Number of glyph candidates before the assignment.
        candidates: usize,
    },

    /// The configuration cannot be used.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why a glyph could not be fully recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnresolvedReason {
    /// No note head was found in the glyph.
    NoHead,
    /// The detected parts match no duration.
    AmbiguousParts,
    /// The head center falls outside every staff band.
    OutsideStaffBands,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnresolvedReason::NoHead => "no note head",
            UnresolvedReason::AmbiguousParts => "parts match no duration",
            UnresolvedReason::OutsideStaffBands => "head outside the staff bands",
        };
        f.write_str(text)
    }
}

/// Non-fatal conditions reported next to a successful reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Diagnostic {
    /// No qualifying line was found to estimate the skew; the page was not rotated.
    DegradedSkewEstimate,
    /// A glyph kept on a staff could not be given a duration or a position.
    UnresolvedGlyph {
        /// Index of the glyph in the reading.
        index: usize,
        /// What is missing.
        reason: UnresolvedReason,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DegradedSkewEstimate => {
                write!(f, "skew could not be estimated, page left unrotated")
            }
            Diagnostic::UnresolvedGlyph { index, reason } => {
                write!(f, "glyph {index} unresolved: {reason}")
            }
        }
    }
}
