use crate::section::Section;
use thiserror::Error;

/// Construction-time validation failures.
///
/// Nothing on the per-frame path returns these; frame work degrades instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("section table is empty")]
    EmptySectionTable,
    #[error("section {index} range [{start}, {end}) does not continue from {expected}")]
    SectionGap {
        index: usize,
        start: f32,
        end: f32,
        expected: f32,
    },
    #[error("section {section:?} appears again at row {index}")]
    DuplicateSection { section: Section, index: usize },
    #[error("section table ends at {end}, expected 1.0")]
    SectionTableEnd { end: f32 },
    #[error("morph needs at least 2 keyframes, got {0}")]
    TooFewKeyframes(usize),
    #[error("keyframe {index} has {found} points, expected {expected}")]
    KeyframeLength {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("keyframe {index} has {found} uvs, expected {expected}")]
    KeyframeUvLength {
        index: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
