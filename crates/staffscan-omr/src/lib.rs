#![deny(missing_docs)]
//! # Staffscan OMR
//!
//! Segmentation and classification of staves and note glyphs in binarized
//! sheet music pages.
//!
//! A page goes through the following stages:
//!
//! 1. [`rotation`] levels the staff lines.
//! 2. [`lines`] splits the page into staff lines, vertical strokes and glyphs.
//! 3. [`extract`] keeps the components of plausible size.
//! 4. [`staff`] groups the staff line segments into staves.
//! 5. [`assign`] attaches every glyph to its staff.
//! 6. [`parts`] finds the head and the stem of every glyph.
//! 7. [`duration`] and [`position`] label the glyphs.
//!
//! [`StaffReader`] runs them all.

/// Assignment of glyphs to staves.
pub mod assign;

/// Configuration of the pipeline.
pub mod config;

/// Duration and clef classification.
pub mod duration;

/// Error and diagnostic types.
pub mod error;

/// Connected component extraction.
pub mod extract;

/// Glyph records.
pub mod glyph;

/// Staff line and stem separation.
pub mod lines;

/// Head and stem segmentation.
pub mod parts;

/// Vertical position on the staff.
pub mod position;

/// The recognition pipeline.
pub mod reader;

/// Skew estimation and leveling.
pub mod rotation;

/// Staff line grouping.
pub mod staff;

pub use crate::config::OmrConfig;
pub use crate::error::{Diagnostic, OmrError};
pub use crate::glyph::NoteGlyph;
pub use crate::reader::{ScoreReading, StaffReader};
