//! Page sections, their scroll ranges and camera poses.

use crate::error::{CoreError, Result};
use glam::Vec3;

/// The six page sections in scroll order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    Home,
    About,
    Skills,
    Projects,
    Experience,
    Contact,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Home,
        Section::About,
        Section::Skills,
        Section::Projects,
        Section::Experience,
        Section::Contact,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn key(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::About => "about",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Experience => "experience",
            Section::Contact => "contact",
        }
    }

    /// Look up a section by its DOM id. Unknown ids resolve to `Home`.
    pub fn from_key(key: &str) -> Section {
        Section::ALL
            .iter()
            .copied()
            .find(|s| s.key() == key)
            .unwrap_or_default()
    }

    /// Index lookup that never fails; out-of-range indices resolve to `Home`.
    pub fn from_index(index: usize) -> Section {
        Section::ALL.get(index).copied().unwrap_or_default()
    }
}

/// Index of a section key, with unmapped keys defaulting to 0.
#[inline]
pub fn section_index(key: &str) -> usize {
    Section::from_key(key).index()
}

/// A section's share of total scroll progress, `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionRange {
    pub section: Section,
    pub start: f32,
    pub end: f32,
}

impl SectionRange {
    #[inline]
    pub fn contains(&self, fraction: f32) -> bool {
        fraction >= self.start && fraction < self.end
    }

    /// Position of `fraction` within this range, clamped to \[0, 1\].
    /// Zero-width ranges report 0.
    #[inline]
    pub fn local_progress(&self, fraction: f32) -> f32 {
        let width = self.end - self.start;
        if width <= 0.0 {
            return 0.0;
        }
        ((fraction - self.start) / width).clamp(0.0, 1.0)
    }
}

/// Where the camera sits while a section is centred.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub const fn new(position: [f32; 3], look_at: [f32; 3]) -> Self {
        Self {
            position: Vec3::from_array(position),
            look_at: Vec3::from_array(look_at),
        }
    }
}

const DEFAULT_RANGES: [(Section, f32, f32); 6] = [
    (Section::Home, 0.0, 0.15),
    (Section::About, 0.15, 0.3),
    (Section::Skills, 0.3, 0.5),
    (Section::Projects, 0.5, 0.7),
    (Section::Experience, 0.7, 0.85),
    (Section::Contact, 0.85, 1.0),
];

const DEFAULT_POSES: [CameraPose; 6] = [
    CameraPose::new([0.0, 0.0, 18.0], [0.0, 0.0, 0.0]),
    CameraPose::new([-4.0, 1.5, 15.0], [-1.0, 0.0, 0.0]),
    CameraPose::new([4.0, -1.0, 14.0], [1.0, 0.5, -2.0]),
    CameraPose::new([0.0, 3.0, 13.0], [0.0, 0.0, -3.0]),
    CameraPose::new([-3.0, -2.0, 16.0], [0.0, -0.5, -1.0]),
    CameraPose::new([0.0, 0.0, 20.0], [0.0, 0.0, 0.0]),
];

/// Ordered, gap-free partition of `[0, 1]` into sections, plus their poses.
#[derive(Clone, Debug)]
pub struct SectionTable {
    ranges: Vec<SectionRange>,
    poses: Vec<CameraPose>,
}

impl Default for SectionTable {
    fn default() -> Self {
        Self {
            ranges: DEFAULT_RANGES
                .iter()
                .map(|&(section, start, end)| SectionRange {
                    section,
                    start,
                    end,
                })
                .collect(),
            poses: DEFAULT_POSES.to_vec(),
        }
    }
}

impl SectionTable {
    /// Build a table, checking that the ranges start at 0, join without gaps
    /// and end at 1, and that no section is listed twice. Missing poses fall
    /// back to the first pose.
    pub fn new(ranges: Vec<SectionRange>, poses: Vec<CameraPose>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(CoreError::EmptySectionTable);
        }
        let mut expected = 0.0_f32;
        for (index, r) in ranges.iter().enumerate() {
            if (r.start - expected).abs() > 1e-6 || r.end < r.start {
                return Err(CoreError::SectionGap {
                    index,
                    start: r.start,
                    end: r.end,
                    expected,
                });
            }
            if let Some(dup) = ranges[..index].iter().find(|p| p.section == r.section) {
                return Err(CoreError::DuplicateSection {
                    section: dup.section,
                    index,
                });
            }
            expected = r.end;
        }
        if (expected - 1.0).abs() > 1e-6 {
            return Err(CoreError::SectionTableEnd { end: expected });
        }
        let fallback = poses.first().copied().unwrap_or(DEFAULT_POSES[0]);
        let mut poses = poses;
        poses.resize(ranges.len(), fallback);
        Ok(Self { ranges, poses })
    }

    pub fn ranges(&self) -> &[SectionRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Index of the range containing `fraction`; falls back to the last
    /// range, which covers `fraction == 1`.
    pub fn locate(&self, fraction: f32) -> usize {
        self.ranges
            .iter()
            .position(|r| r.contains(fraction))
            .unwrap_or(self.ranges.len() - 1)
    }

    pub fn range(&self, index: usize) -> &SectionRange {
        &self.ranges[index.min(self.ranges.len() - 1)]
    }

    /// Pose for `index`; the last pose is reused past the end.
    pub fn pose(&self, index: usize) -> CameraPose {
        self.poses[index.min(self.poses.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_default_to_home() {
        assert_eq!(section_index("projects"), 3);
        assert_eq!(section_index("blog"), 0);
        assert_eq!(Section::from_key(""), Section::Home);
        assert_eq!(Section::from_index(42), Section::Home);
    }

    #[test]
    fn default_table_is_contiguous() {
        let t = SectionTable::default();
        assert!(SectionTable::new(t.ranges().to_vec(), DEFAULT_POSES.to_vec()).is_ok());
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn gaps_are_rejected() {
        let ranges = vec![
            SectionRange {
                section: Section::Home,
                start: 0.0,
                end: 0.4,
            },
            SectionRange {
                section: Section::About,
                start: 0.5,
                end: 1.0,
            },
        ];
        let err = SectionTable::new(ranges, vec![]).unwrap_err();
        assert!(matches!(err, CoreError::SectionGap { index: 1, .. }));
    }

    #[test]
    fn zero_width_range_reports_zero_progress() {
        let r = SectionRange {
            section: Section::Skills,
            start: 0.5,
            end: 0.5,
        };
        assert_eq!(r.local_progress(0.5), 0.0);
    }
}
